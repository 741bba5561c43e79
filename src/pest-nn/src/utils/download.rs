use crate::error::{ClassifyError, Result};

use log::{debug, info};
use std::{
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Makes sure the weights file exists, fetching `url` if it does not.
/// An existing file is never re-downloaded or checked.
pub fn ensure_weights(path: &Path, url: &str) -> Result<()> {
    if path.exists() {
        debug!("Weights present at {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    info!("Downloading weights from {url}");
    let partial = partial_path(path);
    if let Err(err) = download(url, &partial) {
        fs::remove_file(&partial).ok();
        return Err(err);
    }
    fs::rename(&partial, path)?;

    if !path.exists() {
        return Err(ClassifyError::WeightsMissing(path.to_path_buf()));
    }
    info!("Weights saved to {}", path.display());
    Ok(())
}

fn download(url: &str, target: &Path) -> Result<()> {
    let failed = |reason: String| ClassifyError::Download {
        url: url.to_string(),
        reason,
    };

    let response = ureq::get(url).call().map_err(|err| failed(err.to_string()))?;
    // Drive answers oversized or unshared files with an interstitial page.
    if response.content_type() == "text/html" {
        return Err(failed(
            "server returned an HTML page instead of the weights file".into(),
        ));
    }

    let f = fs::File::create(target)?;
    let mut writer = io::BufWriter::new(f);
    let mut reader = response.into_reader();
    io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{BufRead, BufReader},
        net::TcpListener,
        thread,
    };

    /// Serves one HTTP response on a random local port and returns its URL.
    fn serve_once(content_type: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{addr}/weights.pt")
    }

    #[test]
    fn existing_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.pt");
        fs::write(&path, b"cached").unwrap();

        ensure_weights(&path, "http://127.0.0.1:9/never-contacted").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"cached");
    }

    #[test]
    fn fetches_into_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model").join("weights.pt");
        let url = serve_once("application/octet-stream", b"PK\x03\x04 weights");

        ensure_weights(&path, &url).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"PK\x03\x04 weights");
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn html_interstitial_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.pt");
        let url = serve_once("text/html", b"<html>virus scan warning</html>");

        let err = ensure_weights(&path, &url).unwrap_err();
        assert!(matches!(err, ClassifyError::Download { .. }));
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn unreachable_host_is_a_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.pt");

        let err = ensure_weights(&path, "http://127.0.0.1:9/weights.pt").unwrap_err();
        assert!(matches!(err, ClassifyError::Download { .. }), "{err}");
        assert!(!path.exists());
    }
}

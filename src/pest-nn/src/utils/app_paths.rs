use std::path::PathBuf;

pub const WEIGHTS_PATH_ENV: &str = "PEST_NN_WEIGHTS_PATH";
pub const WEIGHTS_URL_ENV: &str = "PEST_NN_WEIGHTS_URL";
pub const DUMMY_PREDICT_ENV: &str = "DUMMY_PREDICT";

pub const DEFAULT_WEIGHTS_PATH: &str = "model/convnext_pestopia_LLRD_best.pt";
pub const DEFAULT_WEIGHTS_URL: &str = "https://drive.usercontent.google.com/download?id=1_f2RHYwA9zA6RzUoHR5Ir3_P5pO3eMy5&export=download&confirm=t";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppPaths {
    pub weights_path: PathBuf,
    pub weights_url: String,
    /// Skip the model entirely and answer with a canned prediction list.
    pub dummy_predict: bool,
}

impl Default for AppPaths {
    fn default() -> Self {
        Self {
            weights_path: DEFAULT_WEIGHTS_PATH.into(),
            weights_url: DEFAULT_WEIGHTS_URL.into(),
            dummy_predict: false,
        }
    }
}

impl AppPaths {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            weights_path: lookup(WEIGHTS_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.weights_path),
            weights_url: lookup(WEIGHTS_URL_ENV).unwrap_or(defaults.weights_url),
            dummy_predict: lookup(DUMMY_PREDICT_ENV).is_some_and(|v| v == "1"),
        }
    }

    pub fn with_weights_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.weights_path = path.into();
        self
    }
}

use crate::{
    common::label_for,
    error::{ClassifyError, Result},
    model::convnext::ConvNext,
};
use burn::{
    prelude::*,
    tensor::{Tensor, activation::softmax},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_name: String,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(class_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            class_name: class_name.into(),
            confidence,
        }
    }
}

fn round4(value: f32) -> f64 {
    (f64::from(value) * 10_000.0).round() / 10_000.0
}

/// Indices of the `k` largest probabilities, highest first. Equal values keep index order.
pub fn top_k(probabilities: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        ord => ord,
    });
    ranked.truncate(k);
    ranked
}

pub fn predictions_from_probabilities(probabilities: &[f32], k: usize) -> Vec<Prediction> {
    top_k(probabilities, k)
        .into_iter()
        .map(|(idx, p)| Prediction::new(label_for(idx), round4(p)))
        .collect()
}

/// Softmax class probabilities for a batch of one.
pub fn infer<B: Backend>(model: &ConvNext<B>, images: Tensor<B, 4>) -> Result<Vec<f32>> {
    let logits = model.forward(images);
    let probabilities = softmax(logits, 1);
    probabilities
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|err| ClassifyError::Tensor(format!("{err:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::{CLASSES, NUM_CLASSES},
        model::convnext::tests::mini_config,
    };
    use burn::backend::NdArray;

    type B = NdArray<f32>;

    #[test]
    fn top_k_orders_by_probability() {
        let probs = [0.1, 0.5, 0.05, 0.35];
        assert_eq!(top_k(&probs, 2), vec![(1, 0.5), (3, 0.35)]);
    }

    #[test]
    fn top_k_is_capped_by_class_count() {
        let probs = [0.2, 0.8];
        assert_eq!(top_k(&probs, 10).len(), 2);
    }

    #[test]
    fn ties_resolve_to_lower_index() {
        let probs = [0.25, 0.25, 0.25, 0.25];
        let idx: Vec<usize> = top_k(&probs, 3).into_iter().map(|(i, _)| i).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn confidences_are_rounded_to_four_places() {
        let mut probs = vec![0.0; NUM_CLASSES];
        probs[72] = 0.876_54;
        probs[128] = 0.123_46;

        let preds = predictions_from_probabilities(&probs, 2);
        assert_eq!(preds[0], Prediction::new("aphids", 0.8765));
        assert_eq!(preds[1], Prediction::new("whitefly", 0.1235));
    }

    #[test]
    fn surplus_logits_get_placeholder_labels() {
        let mut probs = vec![0.0; NUM_CLASSES + 2];
        probs[NUM_CLASSES + 1] = 1.0;

        let preds = predictions_from_probabilities(&probs, 1);
        assert_eq!(preds[0].class_name, "class_133");
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_string(&Prediction::new("Thrips", 0.5)).unwrap();
        assert_eq!(json, r#"{"class_name":"Thrips","confidence":0.5}"#);
    }

    #[test]
    fn forward_pass_yields_a_distribution() {
        let device = Default::default();
        let model = mini_config(NUM_CLASSES).init::<B>(&device);
        let images = Tensor::<B, 4>::random(
            [1, 3, 64, 64],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );

        let probs = infer(&model, images).unwrap();
        assert_eq!(probs.len(), NUM_CLASSES);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);

        let preds = predictions_from_probabilities(&probs, 5);
        assert_eq!(preds.len(), 5);
        assert!(preds.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert!(preds.iter().all(|p| CLASSES.contains(&p.class_name.as_str())));
    }
}

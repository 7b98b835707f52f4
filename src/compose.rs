//! Pipeline composition via the `*` operator.
//!
//! A transformer multiplied by a transformer yields a [`TransformerPipeline`];
//! multiplied by a classifier (or a classifier pipeline) it yields a
//! [`ClassifierPipeline`]. Multiplication is associative: all groupings of
//! `t1 * t2 * c` produce the same pipeline and identical predictions.

use std::ops::Mul;

use ndarray::Array2;

use crate::data::{Data, Panel};
use crate::error::{EstimatorError, Result};
use crate::estimators::{ClassLabel, Classifier, Estimator, Transformer};
use crate::tags::{
    Tags, CAPABILITY_INVERSE_TRANSFORM, CAPABILITY_MULTIVARIATE, SAME_TIME_INDEX,
    TRANSFORM_INPUT_SCITYPE, TRANSFORM_OUTPUT_SCITYPE,
};

/// A chain of transformers applied left to right.
pub struct TransformerPipeline {
    steps: Vec<Box<dyn Transformer>>,
}

impl TransformerPipeline {
    pub fn new(steps: Vec<Box<dyn Transformer>>) -> Self {
        TransformerPipeline { steps }
    }

    pub fn n_steps(&self) -> usize {
        self.steps.len()
    }

    fn transform_through(&self, x: &Data) -> Result<Data> {
        let mut current = x.clone();
        for step in &self.steps {
            current = step.transform(&current)?;
        }
        Ok(current)
    }
}

impl Estimator for TransformerPipeline {
    fn name(&self) -> &'static str {
        "TransformerPipeline"
    }

    fn tags(&self) -> Tags {
        // Capabilities hold for the chain iff they hold for every step;
        // the scitype mapping is first step in, last step out.
        let step_tags: Vec<Tags> = self.steps.iter().map(|s| s.tags()).collect();
        let all = |key: &str| step_tags.iter().all(|t| t.get_bool(key));

        let mut tags = Tags::new()
            .with_bool(CAPABILITY_MULTIVARIATE, all(CAPABILITY_MULTIVARIATE))
            .with_bool(
                CAPABILITY_INVERSE_TRANSFORM,
                all(CAPABILITY_INVERSE_TRANSFORM),
            )
            .with_bool(SAME_TIME_INDEX, all(SAME_TIME_INDEX));
        if let Some(first) = step_tags.first() {
            if let Some(scitype) = first.get_scitype(TRANSFORM_INPUT_SCITYPE) {
                tags = tags.with_scitype(TRANSFORM_INPUT_SCITYPE, scitype);
            }
        }
        if let Some(last) = step_tags.last() {
            if let Some(scitype) = last.get_scitype(TRANSFORM_OUTPUT_SCITYPE) {
                tags = tags.with_scitype(TRANSFORM_OUTPUT_SCITYPE, scitype);
            }
        }
        tags
    }
}

impl Transformer for TransformerPipeline {
    fn fit(&mut self, x: &Data) -> Result<()> {
        let mut current = x.clone();
        for step in self.steps.iter_mut() {
            step.fit(&current)?;
            current = step.transform(&current)?;
        }
        Ok(())
    }

    fn transform(&self, x: &Data) -> Result<Data> {
        self.transform_through(x)
    }

    fn inverse_transform(&self, x: &Data) -> Result<Data> {
        let mut current = x.clone();
        for step in self.steps.iter().rev() {
            current = step.inverse_transform(&current)?;
        }
        Ok(current)
    }
}

/// Transformers chained in front of a classifier.
pub struct ClassifierPipeline {
    transformers: Vec<Box<dyn Transformer>>,
    classifier: Box<dyn Classifier>,
}

impl ClassifierPipeline {
    pub fn new(transformers: Vec<Box<dyn Transformer>>, classifier: Box<dyn Classifier>) -> Self {
        ClassifierPipeline {
            transformers,
            classifier,
        }
    }

    pub fn n_transformers(&self) -> usize {
        self.transformers.len()
    }

    /// Push transformed panel data through the chain. Classifiers consume
    /// panels, so every intermediate output must remain a Panel.
    fn transform_panel(&self, x: &Panel) -> Result<Panel> {
        let mut current = Data::Panel(x.clone());
        for step in &self.transformers {
            current = step.transform(&current)?;
        }
        match current {
            Data::Panel(p) => Ok(p),
            other => Err(EstimatorError::InvalidInput(format!(
                "transformer chain produced {} data, but the classifier requires a Panel",
                other.scitype().as_str()
            ))),
        }
    }
}

impl Estimator for ClassifierPipeline {
    fn name(&self) -> &'static str {
        "ClassifierPipeline"
    }

    fn tags(&self) -> Tags {
        let multivariate = self
            .transformers
            .iter()
            .map(|t| t.tags())
            .chain(std::iter::once(self.classifier.tags()))
            .all(|t| t.get_bool(CAPABILITY_MULTIVARIATE));
        Tags::new().with_bool(CAPABILITY_MULTIVARIATE, multivariate)
    }
}

impl Classifier for ClassifierPipeline {
    fn fit(&mut self, x: &Panel, y: &[ClassLabel]) -> Result<()> {
        let mut current = Data::Panel(x.clone());
        for step in self.transformers.iter_mut() {
            step.fit(&current)?;
            current = step.transform(&current)?;
        }
        let panel = match current {
            Data::Panel(p) => p,
            other => {
                return Err(EstimatorError::InvalidInput(format!(
                    "transformer chain produced {} data, but the classifier requires a Panel",
                    other.scitype().as_str()
                )))
            }
        };
        self.classifier.fit(&panel, y)
    }

    fn predict(&self, x: &Panel) -> Result<Vec<ClassLabel>> {
        let panel = self.transform_panel(x)?;
        self.classifier.predict(&panel)
    }

    fn predict_proba(&self, x: &Panel) -> Result<Array2<f64>> {
        let panel = self.transform_panel(x)?;
        self.classifier.predict_proba(&panel)
    }

    fn classes(&self) -> &[ClassLabel] {
        self.classifier.classes()
    }
}

// --- Mul impls making `t1 * t2 * c` and its groupings equivalent ----------

impl Mul for Box<dyn Transformer> {
    type Output = TransformerPipeline;

    fn mul(self, rhs: Box<dyn Transformer>) -> TransformerPipeline {
        TransformerPipeline::new(vec![self, rhs])
    }
}

impl Mul<TransformerPipeline> for Box<dyn Transformer> {
    type Output = TransformerPipeline;

    fn mul(self, rhs: TransformerPipeline) -> TransformerPipeline {
        let mut steps = vec![self];
        steps.extend(rhs.steps);
        TransformerPipeline::new(steps)
    }
}

impl Mul<Box<dyn Transformer>> for TransformerPipeline {
    type Output = TransformerPipeline;

    fn mul(mut self, rhs: Box<dyn Transformer>) -> TransformerPipeline {
        self.steps.push(rhs);
        self
    }
}

impl Mul for TransformerPipeline {
    type Output = TransformerPipeline;

    fn mul(mut self, rhs: TransformerPipeline) -> TransformerPipeline {
        self.steps.extend(rhs.steps);
        self
    }
}

impl Mul<Box<dyn Classifier>> for Box<dyn Transformer> {
    type Output = ClassifierPipeline;

    fn mul(self, rhs: Box<dyn Classifier>) -> ClassifierPipeline {
        ClassifierPipeline::new(vec![self], rhs)
    }
}

impl Mul<Box<dyn Classifier>> for TransformerPipeline {
    type Output = ClassifierPipeline;

    fn mul(self, rhs: Box<dyn Classifier>) -> ClassifierPipeline {
        ClassifierPipeline::new(self.steps, rhs)
    }
}

impl Mul<ClassifierPipeline> for Box<dyn Transformer> {
    type Output = ClassifierPipeline;

    fn mul(self, rhs: ClassifierPipeline) -> ClassifierPipeline {
        let mut transformers = vec![self];
        transformers.extend(rhs.transformers);
        ClassifierPipeline::new(transformers, rhs.classifier)
    }
}

impl Mul<ClassifierPipeline> for TransformerPipeline {
    type Output = ClassifierPipeline;

    fn mul(self, rhs: ClassifierPipeline) -> ClassifierPipeline {
        let mut transformers = self.steps;
        transformers.extend(rhs.transformers);
        ClassifierPipeline::new(transformers, rhs.classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::KNeighborsTimeSeriesClassifier;
    use crate::transformations::ExponentTransformer;

    fn t(power: f64) -> Box<dyn Transformer> {
        Box::new(ExponentTransformer::new(power))
    }

    fn c() -> Box<dyn Classifier> {
        Box::new(KNeighborsTimeSeriesClassifier::create_test_instance())
    }

    #[test]
    fn groupings_build_equally_sized_pipelines() {
        let p1 = t(4.0) * (t(0.25) * c());
        let p2 = (t(4.0) * t(0.25)) * c();
        let p3 = t(4.0) * t(0.25) * c();

        assert_eq!(p1.n_transformers(), 2);
        assert_eq!(p2.n_transformers(), 2);
        assert_eq!(p3.n_transformers(), 2);
    }

    #[test]
    fn transformer_pipeline_tags_intersect_capabilities() {
        let pipeline = t(2.0) * t(0.5);
        let tags = pipeline.tags();
        assert!(tags.get_bool(CAPABILITY_MULTIVARIATE));
        assert!(tags.get_bool(CAPABILITY_INVERSE_TRANSFORM));
        assert!(tags.get_bool(SAME_TIME_INDEX));
    }
}

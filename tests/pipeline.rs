//! Tests for `*` composition of transformers and classifiers.

use seriate::classifiers::KNeighborsTimeSeriesClassifier;
use seriate::datasets::{make_classification_y, make_panel_x};
use seriate::estimators::{Classifier, Estimator, Transformer};
use seriate::transformations::ExponentTransformer;

const RAND_SEED: u64 = 42;

fn t(power: f64) -> Box<dyn Transformer> {
    Box::new(ExponentTransformer::new(power))
}

fn c() -> Box<dyn Classifier> {
    Box::new(KNeighborsTimeSeriesClassifier::create_test_instance())
}

#[test]
fn test_mul_associativity() {
    let y = make_classification_y(10, 2, RAND_SEED);
    let x = make_panel_x(10, 1, 20, RAND_SEED, Some(&y));
    let x_test = make_panel_x(5, 1, 20, RAND_SEED, None);

    // power 4 then power 1/4 is the identity on positive data, so every
    // grouping must reproduce the bare classifier's predictions
    let mut t12c_1 = t(4.0) * (t(0.25) * c());
    let mut t12c_2 = (t(4.0) * t(0.25)) * c();
    let mut t12c_3 = t(4.0) * t(0.25) * c();

    assert_eq!(t12c_1.n_transformers(), 2);
    assert_eq!(t12c_2.n_transformers(), 2);
    assert_eq!(t12c_3.n_transformers(), 2);
    assert_eq!(t12c_1.name(), "ClassifierPipeline");
    assert_eq!(t12c_2.name(), "ClassifierPipeline");
    assert_eq!(t12c_3.name(), "ClassifierPipeline");

    let mut bare = c();
    bare.fit(&x, &y).expect("bare classifier fit");
    let y_pred = bare.predict(&x_test).expect("bare classifier predict");

    for (label, pipeline) in [
        ("t1 * (t2 * c)", &mut t12c_1),
        ("(t1 * t2) * c", &mut t12c_2),
        ("t1 * t2 * c", &mut t12c_3),
    ] {
        pipeline.fit(&x, &y).expect("pipeline fit");
        let pred = pipeline.predict(&x_test).expect("pipeline predict");
        assert_eq!(
            pred, y_pred,
            "{} predictions differ from the bare classifier",
            label
        );
    }
}

#[test]
fn test_mul_against_manual_chain() {
    use seriate::data::Data;

    let y = make_classification_y(10, 2, RAND_SEED);
    let x = make_panel_x(10, 1, 20, RAND_SEED, Some(&y));
    let x_test = make_panel_x(5, 1, 20, RAND_SEED, None);

    // manual chain: transform train and test, then fit/predict the
    // unwrapped classifier on the transformed panels
    let t1 = ExponentTransformer::new(2.0);
    let t2 = ExponentTransformer::new(0.5);
    let chain = |panel: &seriate::data::Panel| -> seriate::data::Panel {
        let step1 = t1.transform(&Data::Panel(panel.clone())).unwrap();
        let step2 = t2.transform(&step1).unwrap();
        match step2 {
            Data::Panel(p) => p,
            other => panic!("expected Panel, got {:?}", other.scitype()),
        }
    };

    let mut manual = KNeighborsTimeSeriesClassifier::create_test_instance();
    manual.fit(&chain(&x), &y).expect("manual fit");
    let manual_pred = manual.predict(&chain(&x_test)).expect("manual predict");

    let mut pipeline = t(2.0) * t(0.5) * c();
    pipeline.fit(&x, &y).expect("pipeline fit");
    let pipeline_pred = pipeline.predict(&x_test).expect("pipeline predict");

    assert_eq!(pipeline_pred, manual_pred);
}

#[test]
fn test_transformer_pipeline_inverse_round_trip() {
    use seriate::data::{Data, Series};

    let mut pipeline = t(4.0) * t(2.0);
    let x = Data::Series(Series::from_vec(vec![0.5, 1.0, 1.5, 2.0]));

    pipeline.fit(&x).expect("pipeline fit");
    let xt = pipeline.transform(&x).expect("pipeline transform");
    let xit = pipeline.inverse_transform(&xt).expect("pipeline inverse");

    let original = x.as_series().unwrap();
    let restored = xit.as_series().unwrap();
    for i in 0..original.n_timepoints() {
        let a = original.values()[(i, 0)];
        let b = restored.values()[(i, 0)];
        assert!((a - b).abs() < 1e-9, "round trip at {}: {} vs {}", i, a, b);
    }
}

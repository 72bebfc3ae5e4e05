use pretty_assertions::assert_eq;
use stream_eval::{
    config::ClassificationConfig,
    evaluate,
    evaluator::{ClassificationPerformanceEvaluator, Evaluator},
    learner::Learner,
    protocol::PrequentialProtocol,
    Metric,
};

use super::fixtures::{dataset, headers, row, ScriptedLearner};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Evaluator ready to receive predictions for `learners`.
fn prepared(
    config: ClassificationConfig,
    learners: &mut [Box<dyn Learner>],
) -> ClassificationPerformanceEvaluator {
    let mut evaluator = ClassificationPerformanceEvaluator::new(config);
    evaluator.pre_evaluate(learners).unwrap();
    for (i, learner) in learners.iter_mut().enumerate() {
        learner.initialise(&headers()).unwrap();
        evaluator.post_initialise(i, &**learner).unwrap();
    }
    evaluator
}

#[tokio::test]
async fn test_perfect_predictions() {
    let classes = [Some(0), Some(1), Some(2), Some(1), Some(0)];
    let mut learners: Vec<Box<dyn Learner>> =
        vec![Box::new(ScriptedLearner::answering("oracle", &classes))];
    let mut protocol = PrequentialProtocol::new(Box::new(dataset(&classes)));
    let mut evaluator = ClassificationPerformanceEvaluator::default();

    let metric = evaluate(&mut learners, &mut protocol, &mut evaluator)
        .await
        .unwrap();

    let stats = evaluator.stats(0).unwrap();
    assert_eq!(stats.fraction_correct(), 1.0);
    assert!(close(stats.kappa(), 1.0));
    assert!(close(stats.precision(), 1.0));
    assert!(close(stats.recall(), 1.0));
    assert_eq!(
        metric.get("accuracy").and_then(Metric::as_aggregate),
        Some(1.0)
    );
    assert_eq!(
        metric.get("classified instances").and_then(Metric::as_aggregate),
        Some(5.0)
    );
}

#[test]
fn test_zero_weight_row_changes_nothing() {
    let mut learners: Vec<Box<dyn Learner>> = vec![Box::new(ScriptedLearner::new("l"))];
    let mut evaluator = prepared(ClassificationConfig::default(), &mut learners);
    let truth = row(0.0, Some(1));
    evaluator
        .post_predict(0, &*learners[0], &truth, &row(0.0, Some(1)))
        .unwrap();
    let before = evaluator.metric();

    let weightless = row(1.0, Some(2)).with_weight(0.0);
    evaluator
        .post_predict(0, &*learners[0], &weightless, &row(1.0, Some(0)))
        .unwrap();

    assert_eq!(evaluator.metric(), before);
    assert_eq!(evaluator.stats(0).unwrap().total_weight_observed(), 1.0);
}

#[test]
fn test_missing_true_class_is_skipped() {
    let mut learners: Vec<Box<dyn Learner>> = vec![Box::new(ScriptedLearner::new("l"))];
    let mut evaluator = prepared(ClassificationConfig::default(), &mut learners);

    evaluator
        .post_predict(0, &*learners[0], &row(0.0, None), &row(0.0, Some(1)))
        .unwrap();

    assert_eq!(evaluator.stats(0).unwrap().total_weight_observed(), 0.0);
}

#[test]
fn test_missing_prediction_counts_as_wrong() {
    let mut learners: Vec<Box<dyn Learner>> = vec![Box::new(ScriptedLearner::new("l"))];
    let mut evaluator = prepared(ClassificationConfig::default(), &mut learners);

    evaluator
        .post_predict(0, &*learners[0], &row(0.0, Some(0)), &row(0.0, None))
        .unwrap();

    let stats = evaluator.stats(0).unwrap();
    assert_eq!(stats.total_weight_observed(), 1.0);
    assert_eq!(stats.fraction_correct(), 0.0);
}

#[test]
fn test_weighted_accuracy() {
    let mut learners: Vec<Box<dyn Learner>> = vec![Box::new(ScriptedLearner::new("l"))];
    let mut evaluator = prepared(ClassificationConfig::default(), &mut learners);
    let learner = &*learners[0];

    evaluator
        .post_predict(0, learner, &row(0.0, Some(0)).with_weight(3.0), &row(0.0, Some(0)))
        .unwrap();
    evaluator
        .post_predict(0, learner, &row(1.0, Some(1)).with_weight(1.0), &row(1.0, Some(0)))
        .unwrap();

    let stats = evaluator.stats(0).unwrap();
    assert_eq!(stats.total_weight_observed(), 4.0);
    // the mean runs over samples, so a heavy hit lifts it above one
    assert!(close(stats.fraction_correct(), 1.5));
}

#[test]
fn test_metric_shape_for_one_learner() {
    let mut learners: Vec<Box<dyn Learner>> = vec![Box::new(ScriptedLearner::new("l"))];
    let config = ClassificationConfig {
        f1: false,
        precision_per_class: true,
        recall_per_class: false,
        f1_per_class: false,
    };
    let mut evaluator = prepared(config, &mut learners);
    evaluator
        .post_predict(0, &*learners[0], &row(0.0, Some(0)), &row(0.0, Some(0)))
        .unwrap();

    let metric = evaluator.metric();
    assert_eq!(
        metric.names(),
        vec![
            "classified instances",
            "accuracy",
            "kappa",
            "kappa temporal",
            "kappa m",
            "precision",
            "recall",
            "precision per class",
        ]
    );
    assert_eq!(
        metric.get("precision per class"),
        Some(&Metric::Group(vec![
            ("a".to_string(), Metric::Aggregate(1.0)),
            ("b".to_string(), Metric::Aggregate(0.0)),
            ("c".to_string(), Metric::Aggregate(0.0)),
        ]))
    );
}

#[test]
fn test_metric_shape_for_two_learners() {
    let mut learners: Vec<Box<dyn Learner>> = vec![
        Box::new(ScriptedLearner::new("right")),
        Box::new(ScriptedLearner::constant("wrong", Some(2))),
    ];
    let config = ClassificationConfig {
        f1: true,
        precision_per_class: false,
        recall_per_class: true,
        f1_per_class: false,
    };
    let mut evaluator = prepared(config, &mut learners);
    let truth = row(0.0, Some(0));
    evaluator
        .post_predict(0, &*learners[0], &truth, &row(0.0, Some(0)))
        .unwrap();
    evaluator
        .post_predict(1, &*learners[1], &truth, &row(0.0, Some(2)))
        .unwrap();

    let metric = evaluator.metric();
    assert_eq!(
        metric.get("accuracy"),
        Some(&Metric::PerLearner(vec![1.0, 0.0]))
    );
    assert!(metric.get("f1").and_then(Metric::as_per_learner).is_some());
    assert_eq!(
        metric.get("recall per class"),
        Some(&Metric::PerLearnerGroup(vec![
            vec![
                ("a".to_string(), 1.0),
                ("b".to_string(), 0.0),
                ("c".to_string(), 0.0),
            ],
            vec![
                ("a".to_string(), 0.0),
                ("b".to_string(), 0.0),
                ("c".to_string(), 0.0),
            ],
        ]))
    );

    let rendered = metric.to_string();
    assert_eq!(rendered.matches("learner 0").count(), rendered.matches("learner 1").count());
    assert!(rendered.contains("accuracy:\n  learner 0: 1.0000\n  learner 1: 0.0000"));
}

#[test]
fn test_stats_reset_between_runs() {
    let mut learners: Vec<Box<dyn Learner>> = vec![Box::new(ScriptedLearner::new("l"))];
    let mut evaluator = prepared(ClassificationConfig::default(), &mut learners);
    evaluator
        .post_predict(0, &*learners[0], &row(0.0, Some(0)), &row(0.0, Some(0)))
        .unwrap();

    evaluator.pre_evaluate(&learners).unwrap();
    assert!(evaluator.stats(0).is_none());
}

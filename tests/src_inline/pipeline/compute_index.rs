use super::*;
use crate::model::registry::{DEFAULT_INDEX_COLUMN, DEFAULT_PERCENTILE_COLUMN, RegistryDef};
use crate::model::table::CellValue;
use crate::model::weights::DEFAULT_WEIGHT;

fn registry(indicators: &[&str], reversed: &[&str]) -> IndicatorRegistry {
    IndicatorRegistry::from_def(RegistryDef {
        version: "test".to_string(),
        id_column: "id".to_string(),
        name_column: "name".to_string(),
        index_column: DEFAULT_INDEX_COLUMN.to_string(),
        percentile_column: DEFAULT_PERCENTILE_COLUMN.to_string(),
        core_columns: vec!["id".to_string(), "name".to_string()],
        indicator_columns: indicators.iter().map(|s| s.to_string()).collect(),
        reversed_columns: reversed.iter().map(|s| s.to_string()).collect(),
        themes: Vec::new(),
        labels: Default::default(),
    })
    .unwrap()
}

fn table<const N: usize>(columns: &[(&str, [f64; N])]) -> IndicatorTable {
    let n = N;
    let mut cols: Vec<(String, Vec<CellValue>)> = vec![
        ("id".to_string(), (1..=n as i64).map(CellValue::from).collect()),
        (
            "name".to_string(),
            (1..=n).map(|i| CellValue::from(format!("commune {i}"))).collect(),
        ),
    ];
    for (name, values) in columns {
        cols.push((
            name.to_string(),
            values.iter().map(|&v| CellValue::from(v)).collect(),
        ));
    }
    IndicatorTable::from_columns(cols).unwrap()
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn test_three_row_scenario() {
    let reg = registry(&["X"], &[]);
    let t = table(&[("X", [1.0, 2.0, 3.0])]);
    let weights = WeightMapping::from_pairs([("X", 1.0)]);
    let out = compute_index(&t, &reg, Some(&weights)).unwrap();

    let z = out
        .rows()
        .iter()
        .map(|r| r.indicators["X"].standardized)
        .collect::<Vec<_>>();
    assert!(close(z[0], -1.2247, 1e-4));
    assert!(close(z[1], 0.0, 1e-12));
    assert!(close(z[2], 1.2247, 1e-4));

    assert_eq!(out.index_values(), vec![-1.2247, 0.0, 1.2247]);
    assert_eq!(out.percentile_values(), vec![33.0, 67.0, 100.0]);
}

#[test]
fn test_three_row_reversed_scenario() {
    let reg = registry(&["X"], &["X"]);
    let t = table(&[("X", [1.0, 2.0, 3.0])]);
    let weights = WeightMapping::from_pairs([("X", 1.0)]);
    let out = compute_index(&t, &reg, Some(&weights)).unwrap();

    assert_eq!(out.index_values(), vec![1.2247, 0.0, -1.2247]);
    assert_eq!(out.percentile_values(), vec![100.0, 67.0, 33.0]);
    let rec = out.record(0, "X").unwrap();
    assert_eq!(rec.raw, 1.0);
    assert!(rec.standardized > 0.0);
    assert_eq!(rec.weight, 1.0);
    assert_eq!(rec.weighted, rec.standardized);
}

#[test]
fn test_zero_variance_column() {
    let reg = registry(&["X", "Y"], &[]);
    let t = table(&[("X", [1.0, 2.0, 3.0]), ("Y", [5.0, 5.0, 5.0])]);
    let err = compute_index(&t, &reg, None).unwrap_err();
    assert_eq!(err, IndexError::DegenerateColumn("Y".to_string()));
}

#[test]
fn test_default_weight_applied() {
    let reg = registry(&["X"], &[]);
    let t = table(&[("X", [1.0, 2.0, 3.0])]);
    let out = compute_index(&t, &reg, None).unwrap();
    for row in out.rows() {
        assert_eq!(row.indicators["X"].weight, DEFAULT_WEIGHT);
    }
    assert_eq!(out.index_values(), vec![-0.1225, 0.0, 0.1225]);
}

#[test]
fn test_incomplete_weights_never_default() {
    let reg = registry(&["X", "Y"], &[]);
    let t = table(&[("X", [1.0, 2.0, 3.0]), ("Y", [3.0, 1.0, 2.0])]);
    let weights = WeightMapping::from_pairs([("X", 0.5)]);
    let err = compute_index(&t, &reg, Some(&weights)).unwrap_err();
    assert_eq!(err, IndexError::IncompleteWeights(vec!["Y".to_string()]));
}

#[test]
fn test_missing_column() {
    let reg = registry(&["X", "Z"], &[]);
    let t = table(&[("X", [1.0, 2.0, 3.0])]);
    let err = compute_index(&t, &reg, None).unwrap_err();
    assert_eq!(err, IndexError::MissingColumn("Z".to_string()));
}

#[test]
fn test_nan_input() {
    let reg = registry(&["X"], &[]);
    let t = table(&[("X", [1.0, f64::NAN, 3.0])]);
    let err = compute_index(&t, &reg, None).unwrap_err();
    assert!(matches!(err, IndexError::InvalidInput(_)));
}

#[test]
fn test_reversed_raw_increase_lowers_standardized() {
    let reg = registry(&["X"], &["X"]);
    let base = [4.0, 1.0, 6.0, 2.5];
    let before = compute_index(&table(&[("X", base)]), &reg, None).unwrap();
    let mut bumped = base;
    bumped[1] += 2.0;
    let after = compute_index(&table(&[("X", bumped)]), &reg, None).unwrap();
    assert!(
        after.record(1, "X").unwrap().standardized < before.record(1, "X").unwrap().standardized
    );
}

#[test]
fn test_doubling_weights_doubles_index() {
    let reg = registry(&["A", "B", "C"], &["B"]);
    let t = table(&[
        ("A", [3.0, 8.0, 1.0, 4.0, 6.0]),
        ("B", [0.2, 0.9, 0.4, 0.1, 0.7]),
        ("C", [100.0, 250.0, 80.0, 40.0, 310.0]),
    ]);
    let weights = WeightMapping::from_pairs([("A", 0.3), ("B", 0.2), ("C", 0.4)]);
    let single = compute_index(&t, &reg, Some(&weights)).unwrap();
    let double = compute_index(&t, &reg, Some(&weights.scaled(2.0))).unwrap();
    for (a, b) in single.rows().iter().zip(double.rows()) {
        // both sides are rounded to 4 decimals
        assert!(close(b.index, 2.0 * a.index, 2e-4));
        assert_eq!(a.percentile, b.percentile);
    }
}

#[test]
fn test_index_is_weighted_sum() {
    let reg = registry(&["A", "B"], &["B"]);
    let t = table(&[("A", [3.0, 8.0, 1.0, 4.0]), ("B", [0.2, 0.9, 0.4, 0.1])]);
    let weights = WeightMapping::from_pairs([("A", 0.6), ("B", 0.9)]);
    let out = compute_index(&t, &reg, Some(&weights)).unwrap();
    for row in out.rows() {
        let sum = row
            .indicators
            .values()
            .map(|r| r.standardized * r.weight)
            .sum::<f64>();
        assert!(close(row.index, sum, 5e-5 + 1e-12));
    }
}

#[test]
fn test_ties_share_percentile() {
    let reg = registry(&["X"], &[]);
    let t = table(&[("X", [1.0, 2.0, 2.0, 3.0])]);
    let out = compute_index(&t, &reg, None).unwrap();
    assert_eq!(out.percentile_values(), vec![25.0, 62.0, 62.0, 100.0]);
}

#[test]
fn test_idempotent() {
    let reg = registry(&["A", "B"], &["A"]);
    let t = table(&[("A", [0.3, 0.1, 0.7, 0.2]), ("B", [12.0, 3.0, 5.0, 9.0])]);
    let weights = WeightMapping::from_pairs([("A", 0.8), ("B", 0.1)]);
    let a = compute_index(&t, &reg, Some(&weights)).unwrap();
    let b = compute_index(&t, &reg, Some(&weights)).unwrap();
    assert_eq!(a, b);
    for (ra, rb) in a.rows().iter().zip(b.rows()) {
        assert_eq!(ra.index.to_bits(), rb.index.to_bits());
    }
}

#[test]
fn test_fractional_constant_column_rejected() {
    let reg = registry(&["X", "Y"], &[]);
    let t = table(&[("X", [1.0, 2.0, 3.0]), ("Y", [0.1, 0.1, 0.1])]);
    let err = compute_index(&t, &reg, None).unwrap_err();
    assert_eq!(err, IndexError::DegenerateColumn("Y".to_string()));
}

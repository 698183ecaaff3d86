use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::indicators::SnapshotValue;

/// Comparison operators available to a [`Predicate`]. Serialized using the
/// same symbols the config layer accepts (`<`, `<=`, `>`, `>=`, `==`, `!=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

/// The right-hand side of a comparison: a literal, or another snapshot key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rhs {
    Literal(f64),
    Key(String),
}

/// A single comparison against the snapshot: `{lhs_key, operator, use_abs, rhs}`.
/// A missing or non-finite operand makes the whole predicate `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub lhs_key: String,
    pub operator: Operator,
    #[serde(default)]
    pub use_abs: bool,
    pub rhs: Rhs,
}

impl Predicate {
    pub fn new(lhs_key: impl Into<String>, operator: Operator, use_abs: bool, rhs: Rhs) -> Self {
        Self {
            lhs_key: lhs_key.into(),
            operator,
            use_abs,
            rhs,
        }
    }

    pub fn evaluate(&self, snapshot: &HashMap<String, SnapshotValue>) -> bool {
        let lhs = match resolve(&self.lhs_key, snapshot) {
            Some(v) => v,
            None => return false,
        };
        let lhs = if self.use_abs { lhs.abs() } else { lhs };

        let rhs = match &self.rhs {
            Rhs::Literal(v) => *v,
            Rhs::Key(k) => match resolve(k, snapshot) {
                Some(v) => v,
                None => return false,
            },
        };

        match self.operator {
            Operator::Lt => lhs < rhs,
            Operator::Le => lhs <= rhs,
            Operator::Gt => lhs > rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Eq => lhs == rhs,
            Operator::Ne => lhs != rhs,
        }
    }
}

fn resolve(key: &str, snapshot: &HashMap<String, SnapshotValue>) -> Option<f64> {
    let v = snapshot.get(key).and_then(SnapshotValue::as_f64)?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

/// An AND-combined list of predicates. An empty list is vacuously `true`.
#[derive(Debug, Clone, Default)]
pub struct PredicateList(pub Vec<Predicate>);

impl PredicateList {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self(predicates)
    }

    pub fn evaluate(&self, snapshot: &HashMap<String, SnapshotValue>) -> bool {
        self.0.iter().all(|p| p.evaluate(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pairs: &[(&str, f64)]) -> HashMap<String, SnapshotValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), SnapshotValue::Number(*v)))
            .collect()
    }

    #[test]
    fn empty_list_is_vacuously_true() {
        let list = PredicateList::new(vec![]);
        assert!(list.evaluate(&HashMap::new()));
    }

    #[test]
    fn missing_lhs_key_is_false() {
        let p = Predicate::new("z.z_score", Operator::Gt, false, Rhs::Literal(1.0));
        assert!(!p.evaluate(&HashMap::new()));
    }

    #[test]
    fn non_finite_value_is_false() {
        let p = Predicate::new("z.z_score", Operator::Gt, false, Rhs::Literal(1.0));
        assert!(!p.evaluate(&snap_nan("z.z_score")));
    }

    fn snap_nan(key: &str) -> HashMap<String, SnapshotValue> {
        let mut m = HashMap::new();
        m.insert(key.to_string(), SnapshotValue::Number(f64::NAN));
        m
    }

    #[test]
    fn use_abs_flips_negative_lhs() {
        let p = Predicate::new("d.drift", Operator::Gt, true, Rhs::Literal(0.0005));
        assert!(p.evaluate(&snap(&[("d.drift", -0.001)])));
    }

    #[test]
    fn rhs_key_compares_against_another_metric() {
        let p = Predicate::new("fewma.ewma", Operator::Gt, false, Rhs::Key("sewma.ewma".into()));
        assert!(p.evaluate(&snap(&[("fewma.ewma", 1.1), ("sewma.ewma", 1.0)])));
        assert!(!p.evaluate(&snap(&[("fewma.ewma", 0.9), ("sewma.ewma", 1.0)])));
    }

    // S6 — Predicate guard (spec §8).
    #[test]
    fn tick_rate_guard_blocks_sparse_feed() {
        let p = Predicate::new(
            "tick_rate.tick_rate_per_min",
            Operator::Gt,
            false,
            Rhs::Literal(60.0),
        );
        let list = PredicateList::new(vec![p]);
        assert!(!list.evaluate(&snap(&[("tick_rate.tick_rate_per_min", 12.0)])));
    }
}

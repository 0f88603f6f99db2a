//! Trigger conditions - typed comparisons over named stats.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::ConditionError;

/// Comparison operators a condition may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    /// Two-character symbols come first so `<=` is not read as `<`.
    const SYMBOLS: [(&'static str, Comparison); 6] = [
        ("<=", Comparison::Le),
        (">=", Comparison::Ge),
        ("==", Comparison::Eq),
        ("!=", Comparison::Ne),
        ("<", Comparison::Lt),
        (">", Comparison::Gt),
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        }
    }

    pub fn holds(&self, left: i32, right: i32) -> bool {
        match self {
            Comparison::Lt => left < right,
            Comparison::Le => left <= right,
            Comparison::Gt => left > right,
            Comparison::Ge => left >= right,
            Comparison::Eq => left == right,
            Comparison::Ne => left != right,
        }
    }
}

/// `stat <op> threshold`, e.g. `stability < 20`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerCondition {
    pub stat: String,
    pub op: Comparison,
    pub threshold: i32,
}

impl TriggerCondition {
    pub fn new(stat: impl Into<String>, op: Comparison, threshold: i32) -> Self {
        Self {
            stat: stat.into(),
            op,
            threshold,
        }
    }

    /// Evaluate against a stat table. A stat that is not in the table makes the condition false.
    pub fn evaluate(&self, stats: &BTreeMap<String, i32>) -> bool {
        stats
            .get(&self.stat)
            .is_some_and(|value| self.op.holds(*value, self.threshold))
    }
}

fn is_stat_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for TriggerCondition {
    type Err = ConditionError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ConditionError::Empty);
        }

        let (index, symbol, op) = Comparison::SYMBOLS
            .iter()
            .find_map(|(symbol, op)| source.find(symbol).map(|index| (index, *symbol, *op)))
            .ok_or_else(|| ConditionError::MissingOperator(source.to_string()))?;

        let stat = source[..index].trim();
        let threshold = source[index + symbol.len()..].trim();

        if !is_stat_name(stat) {
            return Err(ConditionError::InvalidStat(stat.to_string()));
        }
        let threshold = threshold
            .parse::<i32>()
            .map_err(|_| ConditionError::InvalidThreshold(threshold.to_string()))?;

        Ok(Self::new(stat, op, threshold))
    }
}

impl std::fmt::Display for TriggerCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.stat, self.op.symbol(), self.threshold)
    }
}

//! Which currency sits in each of the two converter slots

use crate::core::currency::CurrencyRecord;
use anyhow::{Result, anyhow};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Side::Left => "left",
                Side::Right => "right",
            }
        )
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            _ => Err(anyhow!("Invalid side: {}", s)),
        }
    }
}

/// Ratio and button label of one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SideSelection {
    pub ratio: f64,
    pub label: String,
}

impl Default for SideSelection {
    fn default() -> Self {
        Self {
            ratio: 1.0,
            label: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub left: SideSelection,
    pub right: SideSelection,
}

impl SelectionState {
    pub fn side(&self, side: Side) -> &SideSelection {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Puts `record` into the given slot. A record with an unusable ratio
    /// leaves the state untouched.
    pub fn select(&mut self, side: Side, record: &CurrencyRecord) -> Result<()> {
        let ratio = record.ratio_value()?;
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        slot.ratio = ratio;
        slot.label = record.display_label();
        debug!(%side, code = %record.char_code, ratio, "Selected currency");
        Ok(())
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

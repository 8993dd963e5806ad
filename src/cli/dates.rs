use std::fmt::Display;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::ValueEnum;

use crate::utils::{
    clock::Clock,
    time::{local_today, parse_date_key},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Turns a `--date` argument into a calendar date. Missing means today, canonical keys are taken
/// as is, anything else goes through natural language parsing ("yesterday", "15/03/2025").
pub fn resolve_date(input: Option<&str>, clock: &dyn Clock, style: DateStyle) -> Result<NaiveDate> {
    let Some(input) = input.map(str::trim) else {
        return Ok(local_today(clock));
    };
    if let Some(date) = parse_date_key(input) {
        return Ok(date);
    }
    let now = clock.time().with_timezone(&Local);
    parse_date_string(input, now, style.into())
        .map(|v| v.date_naive())
        .map_err(|e| anyhow!("Failed to validate date {input:?}: {e}"))
}

// src/models/settings.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::MAX_TIME_LIMIT_MINUTES;

/// Admin-controlled quiz settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Show the explanation for questions the student got right as well.
    #[serde(default)]
    pub show_explanations_for_correct: bool,

    /// Module -> time limit in minutes. Absent means no limit.
    #[serde(default)]
    pub module_time_limits: BTreeMap<String, u32>,

    /// Module -> enabled. Absent means enabled.
    #[serde(default)]
    pub module_availability: BTreeMap<String, bool>,
}

impl QuizSettings {
    pub fn is_enabled(&self, module: &str) -> bool {
        self.module_availability.get(module).copied().unwrap_or(true)
    }

    pub fn time_limit(&self, module: &str) -> Option<u32> {
        self.module_time_limits.get(module).copied().filter(|&m| m > 0)
    }

    /// Drops zero limits (meaning "no limit") and rejects out-of-range ones.
    pub fn sanitized(mut self) -> Result<Self, String> {
        self.module_time_limits.retain(|_, minutes| *minutes > 0);
        if let Some((module, minutes)) = self
            .module_time_limits
            .iter()
            .find(|&(_, &m)| m > MAX_TIME_LIMIT_MINUTES)
        {
            return Err(format!(
                "Time limit for '{}' is {} minutes; the maximum is {}",
                module, minutes, MAX_TIME_LIMIT_MINUTES
            ));
        }
        Ok(self)
    }
}

//! Report generation for discovered mutation points
//!
//! This module formats and displays the mutations available in a set of
//! files, each with the description of the change it would make.

use colored::Colorize;
use serde::Serialize;

use crate::catalog::MutationKind;
use crate::discovery::MutationPoint;
use crate::operator::MutationOperator;

/// One discovered mutation and what it would change
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub point: MutationPoint,
    pub description: String,
}

/// Summary of discovered mutation points
#[derive(Debug, Default, Serialize)]
pub struct DiscoveryReport {
    pub entries: Vec<ReportEntry>,
}

impl DiscoveryReport {
    /// Create a report from operators, describing each against its source
    pub fn from_operators(operators: &[MutationOperator]) -> Self {
        let entries = operators
            .iter()
            .map(|operator| ReportEntry {
                point: MutationPoint {
                    kind: operator.kind(),
                    file_path: operator.file_path().to_string(),
                    position: operator.position(),
                },
                description: operator.description(),
            })
            .collect();

        Self { entries }
    }

    /// Append another report's entries
    pub fn extend(&mut self, other: DiscoveryReport) {
        self.entries.extend(other.entries);
    }

    /// Total number of mutation points
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Number of mutation points of one kind
    pub fn count_for(&self, kind: MutationKind) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.point.kind == kind)
            .count()
    }

    /// Number of distinct files with at least one mutation point
    pub fn files(&self) -> usize {
        let mut files: Vec<&str> = self
            .entries
            .iter()
            .map(|entry| entry.point.file_path.as_str())
            .collect();
        files.sort_unstable();
        files.dedup();
        files.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Print the report to stdout
    pub fn print(&self) {
        println!();
        println!("{}", "Mutation Points".bold());
        println!("{}", "=".repeat(60));
        println!();

        for entry in &self.entries {
            println!(
                "{} {}:{}",
                format!("[{}]", entry.point.kind.label()).cyan().bold(),
                entry.point.file_path,
                entry.point.position
            );
            println!("        {}", entry.description.dimmed());
        }

        println!();
        println!("{}", "Summary".bold());
        println!("{}", "-".repeat(40));
        println!("Files:             {}", self.files());
        println!("Mutation points:   {}", self.total());
        for &kind in MutationKind::all() {
            println!("  {:<24} {}", format!("{}:", kind.label()), self.count_for(kind));
        }
    }
}

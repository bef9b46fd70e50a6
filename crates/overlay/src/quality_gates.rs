// SPDX-License-Identifier: MIT

//! The four presentation forms a quality-gate list can render as, all
//! derived from the same ordered `QualityGate` records (spec.md §4.5).

use ov_core::QualityGate;

/// A single line naming every gate's description, for the read-only
/// "close and report" variant.
pub fn inline(gates: &[QualityGate]) -> String {
    let descriptions: Vec<&str> = gates.iter().map(|g| g.description.as_str()).collect();
    format!("Confirm before closing: {}.", descriptions.join(", "))
}

/// A numbered list, one gate per step, command and description both shown.
pub fn step_list(gates: &[QualityGate]) -> String {
    gates
        .iter()
        .enumerate()
        .map(|(i, g)| format!("{}. Run `{}` — {}", i + 1, g.command, g.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A fenced shell block listing every gate's command in order.
pub fn bash_block(gates: &[QualityGate]) -> String {
    let commands: Vec<&str> = gates.iter().map(|g| g.command.as_str()).collect();
    format!("```sh\n{}\n```", commands.join("\n"))
}

/// A bullet list naming each gate by name, for a quick capabilities summary.
pub fn capabilities_bullets(gates: &[QualityGate]) -> String {
    gates.iter().map(|g| format!("- {}", g.name)).collect::<Vec<_>>().join("\n")
}

/// The lightweight section rendered for read-only capabilities: an inline
/// summary plus a bullet list of gate names, no commands to run directly.
pub fn read_only_section(gates: &[QualityGate]) -> String {
    format!("{}\n\n{}", inline(gates), capabilities_bullets(gates))
}

/// The full section rendered for writable capabilities: a numbered step
/// list of commands, plus the equivalent bash block to run them all.
pub fn writable_section(gates: &[QualityGate]) -> String {
    format!("{}\n\n{}", step_list(gates), bash_block(gates))
}

#[cfg(test)]
#[path = "quality_gates_tests.rs"]
mod tests;

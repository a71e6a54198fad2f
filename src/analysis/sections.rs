// src/analysis/sections.rs
//! Segments a report into its labeled sections

use super::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Strengths,
    Weaknesses,
    MissingSkills,
    OptimizationStrategy,
}

impl Section {
    /// Canonical order in well-formed reports
    pub const ALL: [Section; 4] = [
        Section::Strengths,
        Section::Weaknesses,
        Section::MissingSkills,
        Section::OptimizationStrategy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Strengths => "Strengths:",
            Section::Weaknesses => "Weaknesses:",
            Section::MissingSkills => "Missing Skills & Keywords:",
            Section::OptimizationStrategy => "Optimization Strategy:",
        }
    }

    /// Heading used when the section is shown to a user
    pub fn title(self) -> &'static str {
        self.label().trim_end_matches(':')
    }
}

/// Raw text of each section, indexed like `Section::ALL`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SectionBodies<'t> {
    bodies: [Option<&'t str>; 4],
}

impl<'t> SectionBodies<'t> {
    pub fn get(&self, section: Section) -> Option<&'t str> {
        self.bodies[section as usize]
    }
}

/// Locate every label at its first occurrence. A section runs from the end
/// of its label to the nearest following label of any other section, or
/// to the end of the text. Missing labels leave their section empty.
pub fn segment(text: &str) -> Result<SectionBodies<'_>, ReportError> {
    let starts: Vec<(Section, usize)> = Section::ALL
        .iter()
        .filter_map(|&section| text.find(section.label()).map(|pos| (section, pos)))
        .collect();

    let mut bodies = SectionBodies::default();

    for &(section, label_pos) in &starts {
        let body_start = label_pos + section.label().len();
        let body_end = starts
            .iter()
            .filter(|&&(other, pos)| other != section && pos >= body_start)
            .map(|&(_, pos)| pos)
            .min()
            .unwrap_or(text.len());

        let body = text
            .get(body_start..body_end)
            .ok_or(ReportError::SectionBounds {
                label: section.label(),
            })?;
        bodies.bodies[section as usize] = Some(body);
    }

    Ok(bodies)
}

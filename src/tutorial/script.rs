//! The scripted tour: stage table and threshold resolution.
//!
//! Stages carry display text plus an optional entry action; the indices at
//! which perfusion, diffusion, and washout begin are resolved from the table
//! once at construction so the core gates on plain numbers.

use crate::sim::{StageAction, StageThresholds};

/// What the renderer should visually emphasize during a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightTarget {
    None,
    All,
    Inlet,
    Flow,
    Diffusion,
    Cells,
}

/// One scripted step of the guided tour
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub title: &'static str,
    pub description: &'static str,
    pub highlight: HighlightTarget,
    pub entry_action: Option<StageAction>,
}

const STANDARD_STAGES: [Stage; 7] = [
    Stage {
        title: "The lab-on-chip device",
        description: "A thumb-sized polymer chip replaces the culture dish. Two \
            perfusion channels run past a central hydrogel where motor neurons, \
            axons, and Schwann cells grow, so a whole dosing experiment fits on \
            a microscope stage.",
        highlight: HighlightTarget::All,
        entry_action: None,
    },
    Stage {
        title: "Loading the inlet",
        description: "The pump lines connect at the inlet on the left. Until the \
            drug reservoir is switched in, only plain culture medium enters the \
            channels, keeping the tissue fed and oxygenated.",
        highlight: HighlightTarget::Inlet,
        entry_action: None,
    },
    Stage {
        title: "Perfusion begins",
        description: "The feed switches to drug-laden medium and the orange front \
            pushes into both channels. How fast it crosses the chip depends \
            directly on the pump's flow rate, which you can adjust live.",
        highlight: HighlightTarget::Flow,
        entry_action: Some(StageAction::ResetDrugFront),
    },
    Stage {
        title: "Steady channel flow",
        description: "Flow in channels this small is laminar: the drug travels as \
            an orderly bolus instead of mixing turbulently. Particles trace the \
            streamlines carrying fresh compound past the gel walls.",
        highlight: HighlightTarget::Flow,
        entry_action: None,
    },
    Stage {
        title: "Diffusion into the gel",
        description: "No pump reaches the tissue directly. Drug molecules leave \
            the channels only by diffusing through the gel matrix from both \
            faces, drifting toward the midline as the local concentration \
            builds.",
        highlight: HighlightTarget::Diffusion,
        entry_action: Some(StageAction::SeedDiffusionParticles),
    },
    Stage {
        title: "Tissue response",
        description: "Cells accumulate exposure as the gel saturates, and not \
            evenly: somata respond fastest, axons at about 70% of that rate, \
            and the wrapped Schwann cells at roughly half. Watch the color \
            shift spread.",
        highlight: HighlightTarget::Cells,
        entry_action: Some(StageAction::RaiseDiffusionFloor),
    },
    Stage {
        title: "Washout",
        description: "The reservoir switches back to clean medium. After a short \
            lag while the lines clear, diffusion reverses and exposure fades, \
            though some compartments hold their dose stubbornly.",
        highlight: HighlightTarget::All,
        entry_action: None,
    },
];

/// Ordered stage table with pre-resolved regime thresholds
pub struct TutorialScript {
    stages: Vec<Stage>,
    thresholds: StageThresholds,
}

impl TutorialScript {
    /// The standard seven-stage perfusion tour
    pub fn standard() -> Self {
        Self::from_stages(STANDARD_STAGES.to_vec())
    }

    /// Build a script from a custom stage table (must be non-empty)
    pub fn from_stages(stages: Vec<Stage>) -> Self {
        debug_assert!(!stages.is_empty(), "a script needs at least one stage");
        let thresholds = resolve_thresholds(&stages);
        Self { stages, thresholds }
    }

    /// Stage at `index`, clamped to the table
    pub fn stage(&self, index: usize) -> &Stage {
        &self.stages[index.min(self.last_index())]
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    pub fn thresholds(&self) -> StageThresholds {
        self.thresholds
    }
}

/// Derive regime thresholds from the entry actions.
///
/// Perfusion starts at the stage that resets the front, diffusion at the
/// seeding stage, and washout is always the final stage. A script without a
/// front reset flows from the start; one without seeding never diffuses.
fn resolve_thresholds(stages: &[Stage]) -> StageThresholds {
    let flow = stages
        .iter()
        .position(|s| matches!(s.entry_action, Some(StageAction::ResetDrugFront)))
        .unwrap_or(0);
    let diffusion = stages
        .iter()
        .position(|s| matches!(s.entry_action, Some(StageAction::SeedDiffusionParticles)))
        .unwrap_or(stages.len());

    StageThresholds {
        flow,
        diffusion,
        washout: stages.len().saturating_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_script_shape() {
        let script = TutorialScript::standard();
        assert_eq!(script.len(), 7);
        for i in 0..script.len() {
            let stage = script.stage(i);
            assert!(!stage.title.is_empty());
            assert!(stage.description.len() > 60, "stage {} blurb too thin", i);
        }
    }

    #[test]
    fn test_standard_thresholds() {
        let thresholds = TutorialScript::standard().thresholds();
        assert_eq!(thresholds.flow, 2);
        assert_eq!(thresholds.diffusion, 4);
        assert_eq!(thresholds.washout, 6);
    }

    #[test]
    fn test_stage_lookup_clamps() {
        let script = TutorialScript::standard();
        assert_eq!(script.stage(999).title, script.stage(6).title);
    }

    #[test]
    fn test_threshold_fallbacks_without_actions() {
        let bare = Stage {
            title: "bare",
            description: "no actions at all",
            highlight: HighlightTarget::None,
            entry_action: None,
        };
        let script = TutorialScript::from_stages(vec![bare; 3]);
        let thresholds = script.thresholds();

        assert_eq!(thresholds.flow, 0, "flow defaults to always-on");
        assert_eq!(thresholds.diffusion, 3, "diffusion defaults to never");
        assert_eq!(thresholds.washout, 2);
    }
}

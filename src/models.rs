use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Difficulty tier selected by the user
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "b" => Some(Level::Beginner),
            "intermediate" | "i" => Some(Level::Intermediate),
            "advanced" | "a" => Some(Level::Advanced),
            _ => None,
        }
    }

    /// Parses a level, treating anything unrecognized as `Beginner`.
    pub fn from_str_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    /// Completions needed to fill the progress bar for this level.
    pub fn goal(&self) -> u32 {
        match self {
            Level::Beginner => 20,
            Level::Intermediate => 40,
            Level::Advanced => 60,
        }
    }

    pub fn estimated_time(&self) -> &'static str {
        match self {
            Level::Beginner => "10-15 min",
            Level::Intermediate => "15-20 min",
            Level::Advanced => "25-30 min",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Level::Beginner => Level::Intermediate,
            Level::Intermediate => Level::Advanced,
            Level::Advanced => Level::Beginner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pelvic,
    Breathing,
    Core,
    Strength,
    Mobility,
    Relaxation,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Pelvic => "Pelvic Floor",
            Category::Breathing => "Breathing",
            Category::Core => "Core",
            Category::Strength => "Strength",
            Category::Mobility => "Mobility & Stretching",
            Category::Relaxation => "Relaxation",
        }
    }
}

// Canonical exercise behind a routine step, used to look up descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseId {
    Kegels,
    GluteBridge,
    CoreActivation,
    CoreBracing,
    BoxBreathing,
    DiaphragmaticBreathing,
    MindfulBreathing,
    PelvicTilts,
    Stretching,
    YogaFlow,
    SelfMassage,
    MuscleRelaxation,
    Meditation,
    JointMobility,
    BriskWalk,
    TensionRelease,
    BodyweightSquats,
    PushUps,
    HipHinges,
    SingleLegDeadlift,
    HipStability,
    HipOpeners,
    BalancePoses,
    MindfulMovement,
}

impl ExerciseId {
    pub fn name(&self) -> &'static str {
        match self {
            ExerciseId::Kegels => "Kegels",
            ExerciseId::GluteBridge => "Glute Bridge",
            ExerciseId::CoreActivation => "Core Activation",
            ExerciseId::CoreBracing => "Core Bracing",
            ExerciseId::BoxBreathing => "Box Breathing",
            ExerciseId::DiaphragmaticBreathing => "Diaphragmatic Breathing",
            ExerciseId::MindfulBreathing => "Mindful Breathing",
            ExerciseId::PelvicTilts => "Pelvic Tilts",
            ExerciseId::Stretching => "Simple Stretching",
            ExerciseId::YogaFlow => "Yoga Flow",
            ExerciseId::SelfMassage => "Self Massage",
            ExerciseId::MuscleRelaxation => "Mindful Relaxation",
            ExerciseId::Meditation => "Meditation",
            ExerciseId::JointMobility => "Joint Mobility",
            ExerciseId::BriskWalk => "Brisk Walk",
            ExerciseId::TensionRelease => "Tension Release",
            ExerciseId::BodyweightSquats => "Bodyweight Squats",
            ExerciseId::PushUps => "Wall Pushup",
            ExerciseId::HipHinges => "Hip Hinges",
            ExerciseId::SingleLegDeadlift => "Single-leg Deadlift",
            ExerciseId::HipStability => "Hip Stability",
            ExerciseId::HipOpeners => "Hip Openers",
            ExerciseId::BalancePoses => "Balance Poses",
            ExerciseId::MindfulMovement => "Mindful Movement",
        }
    }

    pub fn categories(&self) -> &'static [Category] {
        use Category::*;
        match self {
            ExerciseId::Kegels => &[Pelvic],
            ExerciseId::GluteBridge => &[Strength, Core, Pelvic],
            ExerciseId::CoreActivation | ExerciseId::CoreBracing => &[Core],
            ExerciseId::BoxBreathing => &[Breathing, Relaxation],
            ExerciseId::DiaphragmaticBreathing => &[Breathing, Core],
            ExerciseId::MindfulBreathing => &[Breathing, Relaxation],
            ExerciseId::PelvicTilts => &[Pelvic, Mobility],
            ExerciseId::Stretching | ExerciseId::JointMobility | ExerciseId::HipOpeners => {
                &[Mobility]
            }
            ExerciseId::YogaFlow | ExerciseId::MindfulMovement => &[Mobility, Relaxation],
            ExerciseId::SelfMassage | ExerciseId::MuscleRelaxation | ExerciseId::Meditation => {
                &[Relaxation]
            }
            ExerciseId::BriskWalk => &[Mobility],
            ExerciseId::TensionRelease => &[Pelvic, Relaxation],
            ExerciseId::BodyweightSquats | ExerciseId::PushUps | ExerciseId::SingleLegDeadlift => {
                &[Strength]
            }
            ExerciseId::HipHinges => &[Strength, Mobility],
            ExerciseId::HipStability | ExerciseId::BalancePoses => &[Core, Strength],
        }
    }
}

/// One prompt in a day's routine. The exercise mapping is fixed in the table,
/// so display text never has to be parsed back into an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    pub text: &'static str,
    pub exercise: ExerciseId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayPlan {
    pub name: &'static str,
    pub focus: &'static str,
    pub description: &'static str,
    pub beginner: &'static [Step],
    pub intermediate: &'static [Step],
    pub advanced: &'static [Step],
}

impl WeekdayPlan {
    pub fn routine(&self, level: Level) -> &'static [Step] {
        match level {
            Level::Beginner => self.beginner,
            Level::Intermediate => self.intermediate,
            Level::Advanced => self.advanced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRoutine {
    pub day_name: &'static str,
    pub focus: &'static str,
    pub description: &'static str,
    pub exercises: &'static [Step],
}

// Durable per-user progress state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub completed_dates: BTreeSet<NaiveDate>,
    pub streak: u32,
    pub total_completed: u32,
    pub level: Level,
}

impl CompletionRecord {
    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.completed_dates.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub completed: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub day: Option<u32>,
    pub date: Option<NaiveDate>,
    pub completed: bool,
}

impl CalendarCell {
    pub fn padding() -> Self {
        Self {
            day: None,
            date: None,
            completed: false,
        }
    }
}

// Completions per weekday, Sunday first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayPattern {
    pub counts: [u32; 7],
}

impl WeekdayPattern {
    pub const LABELS: [&'static str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Display intensity 0-4, relative to the busiest weekday.
    pub fn intensity(&self, weekday: usize) -> u8 {
        let max = self.max();
        if max == 0 {
            return 0;
        }
        let count = self.counts.get(weekday).copied().unwrap_or(0);
        (4 * count).div_ceil(max) as u8
    }

    pub fn intensities(&self) -> [u8; 7] {
        let mut out = [0u8; 7];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.intensity(i);
        }
        out
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

use chrono::{Datelike, NaiveDate};

use crate::models::{DailyRoutine, ExerciseId, Level, Step, WeekdayPlan};

const fn step(text: &'static str, exercise: ExerciseId) -> Step {
    Step { text, exercise }
}

use ExerciseId::*;

const FULL_BEGINNER: &[Step] = &[
    step("🟢 10 Kegel Squeezes (5 sec hold)", Kegels),
    step("💪 10 Glute Bridges", GluteBridge),
    step("🧠 Core Engagement Practice (30 sec)", CoreActivation),
    step("💨 3 Rounds Box Breathing (4-4-4-4)", BoxBreathing),
];

const FULL_INTERMEDIATE: &[Step] = &[
    step("🟢 20 Kegels (mix of quick and 5-10 sec holds)", Kegels),
    step("💪 15 Glute Bridges with 5 sec hold", GluteBridge),
    step("🧠 Core Activation Sequence (60 sec)", CoreActivation),
    step("💨 5 Rounds of Deep Diaphragmatic Breathing", DiaphragmaticBreathing),
    step("🪑 3 sets of Pelvic Tilts (10 reps)", PelvicTilts),
];

const FULL_ADVANCED: &[Step] = &[
    step("🟢 3 sets of 15 Kegels (10 sec hold)", Kegels),
    step("💪 20 Glute Bridges with leg extensions", GluteBridge),
    step("🧠 Comprehensive Core Circuit (90 sec)", CoreActivation),
    step("💨 10 min Alternate Nostril Breathing", MindfulBreathing),
    step("🪑 4 sets of Pelvic Floor Elevations", Kegels),
    step("⚡️ Advanced Tension/Release Practice", TensionRelease),
];

// Indexed by weekday, 0 = Sunday
static WEEKLY_PLAN: [WeekdayPlan; 7] = [
    WeekdayPlan {
        name: "Sunday",
        focus: "Rest or Light Yoga",
        description: "Let body recover fully",
        beginner: &[
            step("🧘‍♂️ 5 min Simple Stretching", Stretching),
            step("💆 Self-massage for Tension Release", SelfMassage),
            step("🌬️ 2 min Deep Breathing", DiaphragmaticBreathing),
        ],
        intermediate: &[
            step("🧘‍♂️ 10 min Gentle Yoga Flow", YogaFlow),
            step("💆 Progressive Muscle Relaxation", MuscleRelaxation),
            step("🌬️ 5 min Mindfulness Breathing", MindfulBreathing),
            step("🔄 Light Joint Mobility Work", JointMobility),
        ],
        advanced: &[
            step("🧘‍♂️ 15 min Restorative Yoga", YogaFlow),
            step("💆 Full Body Self-massage Routine", SelfMassage),
            step("🌬️ 10 min Meditation Practice", Meditation),
            step("🔄 Dynamic Stretching Sequence", Stretching),
            step("🧠 Body Scan Meditation", Meditation),
        ],
    },
    WeekdayPlan {
        name: "Monday",
        focus: "Full Routine",
        description: "Core + Kegels heavy",
        beginner: FULL_BEGINNER,
        intermediate: FULL_INTERMEDIATE,
        advanced: FULL_ADVANCED,
    },
    WeekdayPlan {
        name: "Tuesday",
        focus: "Cardio + Light Core",
        description: "20 min brisk walk + Kegels",
        beginner: &[
            step("🚶 15 min Walk (moderately paced)", BriskWalk),
            step("🟢 5 Kegel Squeezes during walk", Kegels),
            step("💨 3 min Deep Breathing post-walk", DiaphragmaticBreathing),
            step("🧠 Light Core Activation (5 reps)", CoreActivation),
        ],
        intermediate: &[
            step("🚶 20 min Brisk Walk with Interval Speed-ups", BriskWalk),
            step("🟢 10 Kegel Sets during walk (5 sec each)", Kegels),
            step("💨 5 min Controlled Breathing Recovery", DiaphragmaticBreathing),
            step("🧠 Standing Core Exercises (2 sets of 10 reps)", CoreActivation),
            step("🔄 5 min Cool Down Stretches", Stretching),
        ],
        advanced: &[
            step("🚶 25 min Power Walk or Light Jog with Intervals", BriskWalk),
            step(
                "🟢 15 Kegel Sequences during cardio (varying intensity)",
                Kegels,
            ),
            step("💨 7 min Respiratory Control Practice", MindfulBreathing),
            step("🧠 Dynamic Core Series (3 sets of 12 reps)", CoreActivation),
            step("🔄 10 min Comprehensive Cooldown", Stretching),
            step("⚡️ Tension Recognition & Release Exercise", TensionRelease),
        ],
    },
    WeekdayPlan {
        name: "Wednesday",
        focus: "Strength Focus",
        description: "Glutes + Upper Body",
        beginner: &[
            step("💪 10 Bodyweight Squats", BodyweightSquats),
            step("🏋️ 5 Wall Push-ups", PushUps),
            step("🟢 5 Kegels with Glute Engagement", Kegels),
            step("🪑 Hip Hinges (5 reps)", HipHinges),
        ],
        intermediate: &[
            step("💪 15 Bodyweight Squats with Pause", BodyweightSquats),
            step("🏋️ 10 Incline Push-ups", PushUps),
            step("🟢 10 Kegels with Glute Squeeze Combination", Kegels),
            step(
                "🪑 Hip Bridges with Single Leg Extension (8 each side)",
                GluteBridge,
            ),
            step("🧠 Core Bracing Practice (30 sec)", CoreBracing),
        ],
        advanced: &[
            step(
                "💪 20 Squat Variations (standard, pulsing, wide stance)",
                BodyweightSquats,
            ),
            step("🏋️ 15 Standard Push-ups or Variations", PushUps),
            step("🟢 Advanced Kegel Circuit with Movement Integration", Kegels),
            step(
                "🪑 Single-leg Deadlift Movements (12 each side)",
                SingleLegDeadlift,
            ),
            step("🧠 Full Core Engagement with Extremity Movement", CoreBracing),
            step("⚡️ Standing Hip Stability Work", HipStability),
        ],
    },
    WeekdayPlan {
        name: "Thursday",
        focus: "Yoga + Stretch + Kegels",
        description: "Full body release",
        beginner: &[
            step("🧘‍♂️ Simple Standing Flow (5 min)", YogaFlow),
            step("🟢 5 Kegels in Yogic Postures", Kegels),
            step("🌬️ Mindful Breathing with Movement", MindfulBreathing),
            step("💆 Gentle Hip Openers", HipOpeners),
        ],
        intermediate: &[
            step("🧘‍♂️ 15 min Yoga Flow with Focus on Hips", YogaFlow),
            step("🟢 10 Kegels Integrated into Various Poses", Kegels),
            step("🌬️ Breath-synchronized Movement Practice", MindfulMovement),
            step("💆 Deep Hip and Lower Back Release Sequence", HipOpeners),
            step("🧠 Body Awareness Meditation (3 min)", Meditation),
        ],
        advanced: &[
            step("🧘‍♂️ 25 min Comprehensive Yoga Sequence", YogaFlow),
            step(
                "🟢 Advanced Pelvic Floor Work in Multiple Positions",
                Kegels,
            ),
            step("🌬️ Full Pranayama Practice", MindfulBreathing),
            step(
                "💆 Targeted Fascia Release for Hips and Pelvic Region",
                SelfMassage,
            ),
            step("🧠 Moving Meditation with Pelvic Awareness", MindfulMovement),
            step(
                "⚡️ Advanced Balance Poses with Pelvic Floor Engagement",
                BalancePoses,
            ),
        ],
    },
    WeekdayPlan {
        name: "Friday",
        focus: "Full Routine",
        description: "Repeat Monday",
        beginner: FULL_BEGINNER,
        intermediate: FULL_INTERMEDIATE,
        advanced: FULL_ADVANCED,
    },
    WeekdayPlan {
        name: "Saturday",
        focus: "Core + Mind",
        description: "Add breathwork, go slow",
        beginner: &[
            step("🧠 Core Activation (3 sets of 5)", CoreActivation),
            step("🟢 Slow Kegels with Breath (5 reps)", Kegels),
            step("🌬️ 5 min Mindful Breathing", MindfulBreathing),
            step("💆 Progressive Relaxation", MuscleRelaxation),
        ],
        intermediate: &[
            step("🧠 Complete Core Series (3 sets of 10)", CoreActivation),
            step("🟢 Kegel Variations with Visualization (10 reps)", Kegels),
            step("🌬️ 8 min Breath Control Practice", MindfulBreathing),
            step("💆 Body Scanning Meditation", Meditation),
            step("💪 Slow-motion Movement with Awareness", MindfulMovement),
        ],
        advanced: &[
            step("🧠 Advanced Core Integration (4 sets of 12)", CoreActivation),
            step("🟢 Full Pelvic Floor Control Sequence", Kegels),
            step("🌬️ 12 min Advanced Breathwork", MindfulBreathing),
            step("💆 Deep Somatic Awareness Practice", Meditation),
            step("💪 Mind-Muscle Connection Enhancement Drills", MindfulMovement),
            step(
                "⚡️ Integrated Movement with Breath Synchronization",
                MindfulMovement,
            ),
        ],
    },
];

/// Weekday index with Sunday as 0.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

pub fn get_daily_routine(level: Level, date: NaiveDate) -> DailyRoutine {
    let day = &WEEKLY_PLAN[weekday_index(date)];
    DailyRoutine {
        day_name: day.name,
        focus: day.focus,
        description: day.description,
        exercises: day.routine(level),
    }
}

/// Like [`get_daily_routine`] but takes the level as free text; anything
/// unrecognized gets the beginner routine.
pub fn get_daily_routine_by_name(level: &str, date: NaiveDate) -> DailyRoutine {
    get_daily_routine(Level::from_str_or_default(level), date)
}

pub fn get_weekly_plan() -> &'static [WeekdayPlan; 7] {
    &WEEKLY_PLAN
}

pub fn exercise_for(weekday: usize, level: Level, index: usize) -> Option<ExerciseId> {
    WEEKLY_PLAN
        .get(weekday)
        .and_then(|day| day.routine(level).get(index))
        .map(|s| s.exercise)
}

//! Topic-based event bus for combat events.
//!
//! The engine queues [`combat_core::CombatEvent`]s while it resolves casts and
//! ticks. The frame driver drains that queue once per frame and republishes
//! each event here, stamped with its frame, so consumers can subscribe only
//! to the topics they need.

mod bus;

pub use bus::{EventBus, FrameEvent};
pub use combat_core::Topic;

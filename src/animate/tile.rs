//! Tile highlight phases.
//!
//! ```text
//! enter: Pop ──▶ Contract ──▶ BreatheUp ⇄ BreatheDown   (until replaced)
//! exit:  Fade, hidden when the fade settles
//! ```

use crate::config::TileStyle;
use crate::types::Property;

use super::phase::{PhaseBook, PhaseId};
use super::transition::{Hook, Origin, TransitionSpec};

/// Phase ids of the tile highlight cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAnimations {
    /// Played on hover enter.
    pub enter: PhaseId,
    pub contract: PhaseId,
    pub breathe_up: PhaseId,
    pub breathe_down: PhaseId,
    /// Played on hover exit.
    pub exit: PhaseId,
}

impl TileAnimations {
    /// Register the tile phases in `book`.
    pub fn register(book: &mut PhaseBook, style: &TileStyle) -> Self {
        let contract = book.reserve("tile-contract");
        let breathe_up = book.reserve("tile-breathe-up");
        let breathe_down = book.reserve("tile-breathe-down");

        let enter = book.register(
            "tile-pop",
            vec![
                TransitionSpec::duration(
                    Property::Scale,
                    Origin::Value(style.rest_scale),
                    style.pop_scale,
                    style.pop_duration,
                )
                .on_start(Hook::Show)
                .on_end(Hook::Chain(contract)),
                TransitionSpec::duration(
                    Property::Opacity,
                    Origin::Value(style.rest_opacity),
                    style.pop_opacity,
                    style.pop_duration,
                ),
            ],
        );

        book.define(
            contract,
            pair(
                style.rest_scale,
                style.rest_opacity,
                style.contract_duration,
            )
            .map(|spec| chain_scale(spec, breathe_up))
            .to_vec(),
        );
        book.define(
            breathe_up,
            pair(
                style.breathe_scale,
                style.breathe_opacity,
                style.breathe_duration,
            )
            .map(|spec| chain_scale(spec, breathe_down))
            .to_vec(),
        );
        book.define(
            breathe_down,
            pair(style.rest_scale, style.rest_opacity, style.breathe_duration)
                .map(|spec| chain_scale(spec, breathe_up))
                .to_vec(),
        );

        let [scale, opacity] = pair(style.exit_scale, style.exit_opacity, style.exit_duration);
        let exit = book.register("tile-fade", vec![scale, opacity.on_end(Hook::Hide)]);

        Self {
            enter,
            contract,
            breathe_up,
            breathe_down,
            exit,
        }
    }
}

/// Scale and opacity heading from wherever they are to the given targets.
fn pair(scale: f32, opacity: f32, duration: f64) -> [TransitionSpec; 2] {
    [
        TransitionSpec::duration(Property::Scale, Origin::Current, scale, duration),
        TransitionSpec::duration(Property::Opacity, Origin::Current, opacity, duration),
    ]
}

/// The scale transition drives the chain; opacity settles alongside it.
fn chain_scale(spec: TransitionSpec, next: PhaseId) -> TransitionSpec {
    if spec.property == Property::Scale {
        spec.on_end(Hook::Chain(next))
    } else {
        spec
    }
}

use tracing::debug;

use crate::config::PlayerSettings;
use crate::transport::{PlaybackDevice, TransportController};

/// Apply the configured initial shuffle/repeat/volume, and start playing if
/// autoplay is on and there is something to play.
pub fn apply_player_defaults<D: PlaybackDevice>(controller: &mut TransportController<D>, player: &PlayerSettings) {
    controller.set_shuffle(player.shuffle);
    controller.set_repeat(player.repeat);
    controller.set_volume(player.volume);

    if player.autoplay && !controller.playlist().is_empty() {
        controller.toggle_playback();
    }
    debug!(
        shuffle = player.shuffle,
        repeat = player.repeat,
        volume = player.volume,
        autoplay = player.autoplay,
        "applied player defaults"
    );
}

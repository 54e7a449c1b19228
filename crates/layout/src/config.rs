/// Tunables for pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Distance, in points, between a field's horizontal center and the page
    /// center within which a move gesture snaps the field to the center.
    ///
    /// Defaults to `10.0`.
    pub snap_threshold: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 10.0,
        }
    }
}

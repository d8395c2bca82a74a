use glam::{Mat4, Vec3};
use pursuit_kernel::GameSession;

/// Fixed scene palette, RGBA in 0..=1.
pub struct SceneColors;

impl SceneColors {
    /// Zenith sky, #22B0DD.
    pub const SKY_TOP: [f32; 4] = [0.133, 0.690, 0.867, 1.0];
    /// Horizon sky, #87CEEB.
    pub const SKY_BOTTOM: [f32; 4] = [0.529, 0.808, 0.922, 1.0];
    pub const ENEMY: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    /// Flat grass shown until the ground texture is uploaded.
    pub const GRASS: [u8; 4] = [82, 148, 56, 255];
}

/// Directional light position; light travels from here towards the origin.
pub const LIGHT_POSITION: Vec3 = Vec3::new(5.0, 10.0, 5.0);
/// Edge length of the square ground plane.
pub const GROUND_SIZE: f32 = 100.0;

/// One mesh instance to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityInstance {
    pub model: Mat4,
    pub color: [f32; 4],
}

/// The enemy cube, always present.
pub fn enemy_instance(session: &GameSession) -> EntityInstance {
    EntityInstance {
        model: Mat4::from_translation(session.enemy().position),
        color: SceneColors::ENEMY,
    }
}

/// The player model placed at the player, once spawned. `tint` is the
/// model's own base colour.
pub fn player_instance(session: &GameSession, tint: [f32; 4]) -> Option<EntityInstance> {
    session.player().map(|player| EntityInstance {
        model: Mat4::from_translation(player.position),
        color: tint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pursuit_common::GameConfig;

    #[test]
    fn enemy_sits_at_enemy_position() {
        let session = GameSession::new(GameConfig::follow());
        let enemy = enemy_instance(&session);
        assert_eq!(enemy.color, SceneColors::ENEMY);
        assert_eq!(
            enemy.model.transform_point3(Vec3::ZERO),
            Vec3::new(5.0, 0.5, 5.0)
        );
    }

    #[test]
    fn player_absent_before_spawn() {
        let session = GameSession::new(GameConfig::follow());
        assert!(player_instance(&session, [1.0; 4]).is_none());
    }

    #[test]
    fn player_model_follows_player() {
        let mut session = GameSession::new(GameConfig::follow());
        session.spawn_player();
        let tint = [0.2, 0.4, 0.9, 1.0];
        let player = player_instance(&session, tint).unwrap();
        assert_eq!(player.color, tint);
        assert_eq!(
            player.model.transform_point3(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(1.0, 0.5, 0.0)
        );
    }
}

//! Render snapshot
//!
//! Turns the current scene into an ordered list of draw commands in screen
//! pixels. A backend replays them against the sprite sheet and tilemap; the
//! game itself never touches pixels.

use serde::Serialize;

use crate::consts::*;
use crate::palette;
use crate::scene::{Scene, SceneManager};
use crate::sheet;
use crate::sim::{Facing, LevelState, StrikePhase};

/// One drawing operation, coordinates in screen pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DrawCmd {
    Clear {
        color: u8,
    },
    /// Copy a region of the tilemap (in pixels) to the screen
    Tilemap {
        x: i32,
        y: i32,
        src_x: i32,
        src_y: i32,
        w: i32,
        h: i32,
    },
    /// Copy a region of the sprite sheet, color 0 transparent
    Sprite {
        x: i32,
        y: i32,
        u: i32,
        v: i32,
        w: i32,
        h: i32,
        flip: bool,
    },
    Pixel {
        x: i32,
        y: i32,
        color: u8,
    },
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: u8,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        color: u8,
    },
}

/// Everything to draw for one frame, back to front
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub cmds: Vec<DrawCmd>,
}

/// Glyph advance used to center HUD text
const GLYPH_WIDTH: i32 = 4;
const HUD_TEXT_Y: i32 = 110;

pub fn build_frame(manager: &SceneManager) -> Frame {
    let mut frame = Frame::default();
    match manager.scene() {
        Scene::Intro => frame.cmds.push(backdrop(sheet::INTRO_BACKDROP)),
        Scene::Lost(_) => frame.cmds.push(backdrop(sheet::LOST_BACKDROP)),
        Scene::Final => frame.cmds.push(backdrop(sheet::FINAL_BACKDROP)),
        Scene::Level(state) => draw_level(state, &mut frame.cmds),
    }
    frame
}

fn backdrop((src_x, src_y): (i32, i32)) -> DrawCmd {
    DrawCmd::Tilemap {
        x: 0,
        y: 0,
        src_x,
        src_y,
        w: WINDOW_WIDTH,
        h: WINDOW_HEIGHT,
    }
}

fn sprite(pos: glam::IVec2, (u, v): (i32, i32), w: i32, h: i32, flip: bool) -> DrawCmd {
    DrawCmd::Sprite {
        x: pos.x,
        y: pos.y,
        u,
        v,
        w,
        h,
        flip,
    }
}

pub fn draw_level(state: &LevelState, cmds: &mut Vec<DrawCmd>) {
    let camera = state.camera;
    cmds.push(DrawCmd::Clear {
        color: palette::BACKGROUND,
    });
    cmds.push(DrawCmd::Tilemap {
        x: 0,
        y: 0,
        src_x: camera.pos.x,
        src_y: camera.pos.y,
        w: SCREEN_WIDTH,
        h: SCREEN_HEIGHT,
    });

    let view = camera.view();
    for hound in &state.hounds {
        // Off-screen hounds would be clipped anyway
        if !hound.bounds().overlaps(&view) {
            continue;
        }
        let uv = hound
            .burning_sprite(state.tuning.burn_ticks)
            .unwrap_or_else(|| hound.breed.sprite());
        cmds.push(sprite(
            camera.to_screen(hound.pos),
            uv,
            ACTOR_SIZE,
            ACTOR_SIZE,
            hound.facing == Facing::Right,
        ));
    }

    for shot in &state.shots {
        for pixel in shot.pixels() {
            let p = camera.to_screen(pixel);
            cmds.push(DrawCmd::Pixel {
                x: p.x,
                y: p.y,
                color: palette::SHOT,
            });
        }
    }

    cmds.push(sprite(
        camera.to_screen(state.player.pos),
        sheet::PLAYER,
        ACTOR_SIZE,
        ACTOR_SIZE,
        false,
    ));

    if let Some(strike) = &state.strike {
        match strike.phase() {
            StrikePhase::Descending => cmds.push(sprite(
                camera.to_screen(strike.pos),
                sheet::MISSILE,
                MISSILE_WIDTH,
                MISSILE_HEIGHT,
                false,
            )),
            StrikePhase::Exploding => cmds.push(sprite(
                camera.to_screen(strike.explosion_origin()),
                strike.explosion_sprite(),
                EXPLOSION_SIZE,
                EXPLOSION_SIZE,
                false,
            )),
            StrikePhase::Finished => {}
        }
    }

    draw_hud(state.kills, cmds);
}

fn draw_hud(kills: u32, cmds: &mut Vec<DrawCmd>) {
    cmds.push(DrawCmd::Rect {
        x: 0,
        y: SCREEN_HEIGHT,
        w: WINDOW_WIDTH,
        h: WINDOW_HEIGHT - SCREEN_HEIGHT,
        color: palette::HUD,
    });
    let text = hud_text(kills);
    let width = text.chars().count() as i32 * GLYPH_WIDTH;
    cmds.push(DrawCmd::Text {
        x: (WINDOW_WIDTH - width) / 2,
        y: HUD_TEXT_Y,
        text,
        color: palette::TEXT,
    });
}

pub fn hud_text(kills: u32) -> String {
    format!("hounds down: {kills}")
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::input::{Key, KeyState};
    use crate::settings::{Settings, Tuning};
    use crate::sim::{Direction, Hound, HoundBreed, HoundState, LevelDef, MissileStrike, Shot};

    fn manager() -> SceneManager {
        let level = LevelDef::builtin().unwrap().build().unwrap();
        let settings = Settings {
            tuning: Tuning {
                hound_count: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        SceneManager::new(level, settings, 3)
    }

    fn start(mgr: &mut SceneManager) {
        let mut keys = KeyState::new();
        keys.press(Key::Space);
        mgr.update(&keys);
    }

    #[test]
    fn test_intro_is_single_backdrop() {
        let frame = build_frame(&manager());
        assert_eq!(
            frame.cmds,
            vec![DrawCmd::Tilemap {
                x: 0,
                y: 0,
                src_x: 0,
                src_y: 320,
                w: 128,
                h: 128
            }]
        );
    }

    #[test]
    fn test_level_frame_layout() {
        let mut mgr = manager();
        start(&mut mgr);
        let state = mgr.level_state_mut().unwrap();
        // Player at (64, 192) puts the camera at (0, 144)
        assert_eq!(state.camera.pos, IVec2::new(0, 144));
        state.hounds.push(Hound::new(90, IVec2::new(20, 150), HoundBreed::Purple));
        let mut burning = Hound::new(91, IVec2::new(40, 150), HoundBreed::Ginger);
        burning.facing = Facing::Left;
        burning.state = HoundState::Burning { ticks_left: 3 };
        state.hounds.push(burning);
        // Far away, culled
        state.hounds.push(Hound::new(92, IVec2::new(400, 20), HoundBreed::Ginger));
        state.shots.push(Shot::fire(IVec2::new(64, 192), Direction::Up));
        state.kills = 12;

        let cmds = build_frame(&mgr).cmds;
        assert_eq!(cmds[0], DrawCmd::Clear { color: 5 });
        assert_eq!(
            cmds[1],
            DrawCmd::Tilemap {
                x: 0,
                y: 0,
                src_x: 0,
                src_y: 144,
                w: 128,
                h: 96
            }
        );
        assert_eq!(
            cmds[2],
            DrawCmd::Sprite {
                x: 20,
                y: 6,
                u: 16,
                v: 96,
                w: 16,
                h: 16,
                flip: true
            }
        );
        assert_eq!(
            cmds[3],
            DrawCmd::Sprite {
                x: 40,
                y: 6,
                u: 48,
                v: 112,
                w: 16,
                h: 16,
                flip: false
            }
        );
        assert_eq!(cmds[4], DrawCmd::Pixel { x: 69, y: 51, color: 8 });
        assert_eq!(cmds[5], DrawCmd::Pixel { x: 72, y: 51, color: 8 });
        assert!(matches!(cmds[6], DrawCmd::Sprite { x: 64, y: 48, u: 0, v: 16, .. }));
        assert_eq!(
            cmds[7],
            DrawCmd::Rect {
                x: 0,
                y: 96,
                w: 128,
                h: 32,
                color: 1
            }
        );
        // "hounds down: 12" is 15 glyphs, 60 px wide
        assert_eq!(
            cmds[8],
            DrawCmd::Text {
                x: 34,
                y: 110,
                text: "hounds down: 12".into(),
                color: 7
            }
        );
        assert_eq!(cmds.len(), 9);
    }

    #[test]
    fn test_strike_sprites() {
        let mut mgr = manager();
        start(&mut mgr);
        let state = mgr.level_state_mut().unwrap();
        let strike = MissileStrike::new(state.player.pos, state.camera.pos.y, &state.tuning);
        state.strike = Some(strike);

        let cmds = build_frame(&mgr).cmds;
        assert!(cmds.contains(&DrawCmd::Sprite {
            x: 68,
            y: 0,
            u: 0,
            v: 136,
            w: 8,
            h: 24,
            flip: false
        }));

        let state = mgr.level_state_mut().unwrap();
        if let Some(strike) = state.strike.as_mut() {
            strike.pos.y = strike.y_final + 1;
        }
        let cmds = build_frame(&mgr).cmds;
        // Missile at (68, 185) world; explosion drawn 12 px left of it
        assert!(cmds.contains(&DrawCmd::Sprite {
            x: 56,
            y: 41,
            u: 96,
            v: 8,
            w: 24,
            h: 24,
            flip: false
        }));
    }

    #[test]
    fn test_frame_serializes() {
        let mut mgr = manager();
        start(&mut mgr);
        let json = serde_json::to_string(&build_frame(&mgr)).unwrap();
        assert!(json.contains("Tilemap"));
        assert!(json.contains("hounds down: 0"));
    }
}

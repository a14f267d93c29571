//! Procedural facility generation and spatial queries
//!
//! The arena is a tile grid carved into a corridor lattice with rooms at
//! intersections, a large central command room, and extra L-shaped connecting
//! corridors. Rooms are dressed with props by archetype, then a cosmetic pass
//! sprinkles decals, hazards, animated tiles, and wall elements. All of it is
//! deterministic given the session RNG state.
//!
//! Query surfaces never panic: out-of-bounds reads degrade to "solid" and the
//! far-floor sampler falls back to the best candidate seen.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{SAFE_SPAWN_DIST, TILE, WORLD_H, WORLD_W};
use crate::dist_sq;

/// Corridor width in tiles
const HALL_WIDTH: i32 = 3;
/// Spacing between vertical corridors
const ROOM_SPACING_X: i32 = 16;
/// Spacing between horizontal corridors
const ROOM_SPACING_Y: i32 = 12;
/// Extra room-to-room connection passes
const CONNECTION_PASSES: u32 = 15;
/// Bounded attempts for the far-floor rejection sampler
const FLOOR_SAMPLE_ATTEMPTS: u32 = 140;
/// Number of wall/floor sprite variants the renderer provides
const TILE_VARIANTS: u8 = 8;
/// Number of wall element sprites (terminal, pipes, vent, ...)
const WALL_ELEMENT_VARIANTS: u8 = 8;

/// Decorative props placed on floor tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    /// Terminal facing into the room from the north wall
    ComputerN,
    /// Terminal facing into the room from the south wall
    ComputerS,
    Holotable,
    Container,
    Crate,
    Barrel,
    AmmoCrate,
    WeaponRack,
    Column,
    Generator,
    LightPost,
    PipeVertical,
    SmallCrate,
}

/// Floor decal overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecalKind {
    ShellCasing,
    Debris,
    BloodPool,
    OilSpill,
    ScorchMark,
}

/// Hazard floor tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Toxic,
    Electric,
    Heat,
}

/// Animated tile bindings (renderer owns the frame data)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileAnimKind {
    FlickeringLight,
    SteamVent,
    ElectricalPanel,
}

/// Room archetypes driving prop placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomStyle {
    Command,
    Storage,
    Armory,
    Machinery,
}

/// Axis-aligned room rectangle in tile units, kept for prop placement
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// Tile grid, floor list, and sparse decoration maps.
///
/// Owned exclusively by the session; rebuilt wholesale on regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub w: i32,
    pub h: i32,
    /// Row-major solidity; the border ring is always solid
    solid: Vec<bool>,
    /// All non-solid interior tiles, for uniform spawn sampling
    pub floor: Vec<(i32, i32)>,
    pub rooms: Vec<Room>,
    /// Per-tile cosmetic variant indices (row-major, 0..8)
    pub wall_variants: Vec<u8>,
    pub floor_variants: Vec<u8>,
    /// Sparse decoration maps keyed by tile coordinate
    pub decals: HashMap<(i32, i32), DecalKind>,
    pub hazards: HashMap<(i32, i32), HazardKind>,
    pub anim_tiles: HashMap<(i32, i32), TileAnimKind>,
    pub wall_elements: HashMap<(i32, i32), u8>,
    pub props: HashMap<(i32, i32), PropKind>,
}

impl Arena {
    /// All-solid grid, generation's starting point
    fn filled(w: i32, h: i32) -> Self {
        let cells = (w * h) as usize;
        Self {
            w,
            h,
            solid: vec![true; cells],
            floor: Vec::new(),
            rooms: Vec::new(),
            wall_variants: vec![0; cells],
            floor_variants: vec![0; cells],
            decals: HashMap::new(),
            hazards: HashMap::new(),
            anim_tiles: HashMap::new(),
            wall_elements: HashMap::new(),
            props: HashMap::new(),
        }
    }

    /// Generate a fresh facility layout from the RNG state
    pub fn generate(rng: &mut Pcg32) -> Self {
        let mut arena = Self::filled(WORLD_W, WORLD_H);
        arena.carve_layout(rng);
        arena.rebuild_floor();
        arena.place_props(rng);
        arena.assign_variants(rng);
        log::info!(
            "arena generated: {} rooms, {} floor tiles, {} props",
            arena.rooms.len(),
            arena.floor.len(),
            arena.props.len()
        );
        arena
    }

    #[inline]
    fn idx(&self, tx: i32, ty: i32) -> usize {
        (ty * self.w + tx) as usize
    }

    #[inline]
    fn in_bounds(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && ty >= 0 && tx < self.w && ty < self.h
    }

    /// Tile solidity; out-of-bounds counts as solid
    #[inline]
    pub fn is_solid(&self, tx: i32, ty: i32) -> bool {
        !self.in_bounds(tx, ty) || self.solid[self.idx(tx, ty)]
    }

    #[inline]
    fn is_floor(&self, tx: i32, ty: i32) -> bool {
        !self.is_solid(tx, ty)
    }

    /// Carve a floor tile; out-of-bounds is ignored
    pub fn carve(&mut self, tx: i32, ty: i32) {
        if self.in_bounds(tx, ty) {
            let i = self.idx(tx, ty);
            self.solid[i] = false;
        }
    }

    fn carve_layout(&mut self, rng: &mut Pcg32) {
        let (cx, cy) = (self.w / 2, self.h / 2);

        // Horizontal corridors at regular spacing with jitter; skip any whose
        // jittered row would breach the border margin
        for gy in (3..self.h - 3).step_by(ROOM_SPACING_Y as usize) {
            let corridor_y = gy + rng.random_range(-1..=1);
            if corridor_y < 3 || corridor_y > self.h - 4 {
                continue;
            }
            for tx in 3..self.w - 3 {
                for dw in 0..HALL_WIDTH {
                    self.carve(tx, corridor_y + dw);
                }
            }
        }

        // Vertical corridors
        for gx in (4..self.w - 4).step_by(ROOM_SPACING_X as usize) {
            let corridor_x = gx + rng.random_range(-1..=1);
            if corridor_x < 3 || corridor_x > self.w - 5 {
                continue;
            }
            for ty in 3..self.h - 3 {
                for dw in 0..HALL_WIDTH {
                    self.carve(corridor_x + dw, ty);
                }
            }
        }

        // Rooms at a subset of grid intersections
        for gy in (3..self.h - 8).step_by(ROOM_SPACING_Y as usize) {
            for gx in (4..self.w - 10).step_by(ROOM_SPACING_X as usize) {
                if rng.random::<f32>() >= 0.7 {
                    continue;
                }
                let room_w = rng.random_range(6..=10);
                let room_h = rng.random_range(5..=8);
                let rx = gx + rng.random_range(-2..=2);
                let ry = gy + rng.random_range(-1..=1);
                for ty in ry..(ry + room_h).min(self.h - 2) {
                    for tx in rx..(rx + room_w).min(self.w - 2) {
                        if tx > 1 && ty > 1 {
                            self.carve(tx, ty);
                        }
                    }
                }
                self.rooms.push(Room { x: rx, y: ry, w: room_w, h: room_h });
            }
        }

        // Central command room, always present and larger
        for oy in -5..=5 {
            for ox in -6..=6 {
                self.carve(cx + ox, cy + oy);
            }
        }
        self.rooms.push(Room { x: cx - 6, y: cy - 5, w: 13, h: 11 });

        // Extra L-shaped corridors between random room pairs. Heuristic, not
        // a connectivity proof; the corridor lattice keeps isolation rare.
        for _ in 0..CONNECTION_PASSES {
            if self.rooms.len() < 2 {
                break;
            }
            let r1 = self.rooms[rng.random_range(0..self.rooms.len())];
            let r2 = self.rooms[rng.random_range(0..self.rooms.len())];
            let (x1, y1) = r1.center();
            let (x2, y2) = r2.center();
            for tx in x1.min(x2)..=x1.max(x2) {
                for dw in 0..HALL_WIDTH {
                    if y1 + dw > 1 && y1 + dw < self.h - 1 {
                        self.carve(tx, y1 + dw);
                    }
                }
            }
            for ty in y1.min(y2)..=y1.max(y2) {
                for dw in 0..HALL_WIDTH {
                    if x2 + dw > 1 && x2 + dw < self.w - 1 {
                        self.carve(x2 + dw, ty);
                    }
                }
            }
        }
    }

    /// Rebuild the flat floor list from the interior of the grid
    fn rebuild_floor(&mut self) {
        self.floor.clear();
        for ty in 1..self.h - 1 {
            for tx in 1..self.w - 1 {
                if self.is_floor(tx, ty) {
                    self.floor.push((tx, ty));
                }
            }
        }
    }

    fn place_props(&mut self, rng: &mut Pcg32) {
        let (cx, cy) = (self.w / 2, self.h / 2);
        let mut placed: Vec<((i32, i32), PropKind)> = Vec::new();

        for room in &self.rooms {
            let Room { x: rx, y: ry, w: rw, h: rh } = *room;
            if rw < 5 || rh < 4 {
                continue;
            }

            // The central room is always the command room
            let (rcx, rcy) = room.center();
            let is_central = (rcx - cx).abs() < 8 && (rcy - cy).abs() < 6;
            let style = if is_central {
                RoomStyle::Command
            } else {
                match rng.random_range(0..4) {
                    0 => RoomStyle::Command,
                    1 => RoomStyle::Storage,
                    2 => RoomStyle::Armory,
                    _ => RoomStyle::Machinery,
                }
            };

            match style {
                RoomStyle::Command => {
                    // Terminals against walls that face outward (solid tile
                    // immediately beyond them)
                    for x in (rx + 2..rx + rw - 2).step_by(3) {
                        if self.is_floor(x, ry) && self.is_solid(x, ry - 1) {
                            placed.push(((x, ry), PropKind::ComputerN));
                        }
                    }
                    for x in (rx + 2..rx + rw - 2).step_by(3) {
                        if self.is_floor(x, ry + rh - 1) && self.is_solid(x, ry + rh) {
                            placed.push(((x, ry + rh - 1), PropKind::ComputerS));
                        }
                    }
                    if rw >= 8 && rh >= 6 {
                        let (hx, hy) = room.center();
                        if self.is_floor(hx, hy) {
                            placed.push(((hx, hy), PropKind::Holotable));
                        }
                    }
                }
                RoomStyle::Storage => {
                    // Containers on a stride grid with a keep probability
                    for y in (ry + 1..ry + rh - 1).step_by(2) {
                        for x in (rx + 1..rx + rw - 1).step_by(3) {
                            if self.is_floor(x, y) && rng.random::<f32>() < 0.6 {
                                let kind = match rng.random_range(0..3) {
                                    0 => PropKind::Container,
                                    1 => PropKind::Crate,
                                    _ => PropKind::Barrel,
                                };
                                placed.push(((x, y), kind));
                            }
                        }
                    }
                }
                RoomStyle::Armory => {
                    for x in (rx + 1..rx + rw - 1).step_by(2) {
                        if self.is_floor(x, ry + 1) && rng.random::<f32>() < 0.7 {
                            placed.push(((x, ry + 1), PropKind::AmmoCrate));
                        }
                    }
                    for x in (rx + 1..rx + rw - 1).step_by(2) {
                        if self.is_floor(x, ry + rh - 2) && rng.random::<f32>() < 0.5 {
                            placed.push(((x, ry + rh - 2), PropKind::WeaponRack));
                        }
                    }
                }
                RoomStyle::Machinery => {
                    let corners = [
                        (rx + 1, ry + 1),
                        (rx + rw - 2, ry + 1),
                        (rx + 1, ry + rh - 2),
                        (rx + rw - 2, ry + rh - 2),
                    ];
                    for (px, py) in corners {
                        if self.is_floor(px, py) {
                            placed.push(((px, py), PropKind::Column));
                        }
                    }
                    if rw >= 6 && rh >= 5 {
                        let (mx, my) = room.center();
                        if self.is_floor(mx, my) {
                            placed.push(((mx, my), PropKind::Generator));
                        }
                    }
                }
            }
        }

        self.props.extend(placed);

        // Sparse props in narrow corridors (tiles with <= 2 carved cardinal
        // neighbors)
        let narrow: Vec<(i32, i32)> = self
            .floor
            .iter()
            .copied()
            .filter(|&(tx, ty)| {
                !self.props.contains_key(&(tx, ty))
                    && self.neighbor_mask(tx, ty).count_ones() <= 2
            })
            .collect();
        for (tx, ty) in narrow {
            if rng.random::<f32>() < 0.02 {
                let kind = match rng.random_range(0..3) {
                    0 => PropKind::LightPost,
                    1 => PropKind::PipeVertical,
                    _ => PropKind::SmallCrate,
                };
                self.props.insert((tx, ty), kind);
            }
        }
    }

    /// Cosmetic pass: tile variants, wall elements, decals, hazards, and
    /// animated tile bindings. Rolls are independent, so one floor tile can
    /// carry several decorations.
    fn assign_variants(&mut self, rng: &mut Pcg32) {
        for ty in 0..self.h {
            for tx in 0..self.w {
                let i = self.idx(tx, ty);
                self.wall_variants[i] = rng.random_range(0..TILE_VARIANTS);
                self.floor_variants[i] = rng.random_range(0..TILE_VARIANTS);

                if self.solid[i] {
                    if !self.is_interior_wall(tx, ty) && rng.random::<f32>() < 0.08 {
                        self.wall_elements
                            .insert((tx, ty), rng.random_range(0..WALL_ELEMENT_VARIANTS));
                    }
                } else {
                    if rng.random::<f32>() < 0.05 {
                        let decal = match rng.random_range(0..5) {
                            0 => DecalKind::ShellCasing,
                            1 => DecalKind::Debris,
                            2 => DecalKind::BloodPool,
                            3 => DecalKind::OilSpill,
                            _ => DecalKind::ScorchMark,
                        };
                        self.decals.insert((tx, ty), decal);
                    }
                    if rng.random::<f32>() < 0.02 {
                        let hazard = match rng.random_range(0..3) {
                            0 => HazardKind::Toxic,
                            1 => HazardKind::Electric,
                            _ => HazardKind::Heat,
                        };
                        self.hazards.insert((tx, ty), hazard);
                    }
                    if rng.random::<f32>() < 0.03 {
                        let anim = match rng.random_range(0..3) {
                            0 => TileAnimKind::FlickeringLight,
                            1 => TileAnimKind::SteamVent,
                            _ => TileAnimKind::ElectricalPanel,
                        };
                        self.anim_tiles.insert((tx, ty), anim);
                    }
                }
            }
        }
    }

    /// 4-bit cardinal floor mask for autotiling: N=1, E=2, S=4, W=8
    pub fn neighbor_mask(&self, tx: i32, ty: i32) -> u8 {
        let mut mask = 0;
        if self.is_floor(tx, ty - 1) {
            mask |= 1;
        }
        if self.is_floor(tx + 1, ty) {
            mask |= 2;
        }
        if self.is_floor(tx, ty + 1) {
            mask |= 4;
        }
        if self.is_floor(tx - 1, ty) {
            mask |= 8;
        }
        mask
    }

    /// 4-bit diagonal floor mask for corner rounding: NW=1, NE=2, SW=4, SE=8
    pub fn diagonal_mask(&self, tx: i32, ty: i32) -> u8 {
        let mut mask = 0;
        if self.is_floor(tx - 1, ty - 1) {
            mask |= 1;
        }
        if self.is_floor(tx + 1, ty - 1) {
            mask |= 2;
        }
        if self.is_floor(tx - 1, ty + 1) {
            mask |= 4;
        }
        if self.is_floor(tx + 1, ty + 1) {
            mask |= 8;
        }
        mask
    }

    /// True iff the tile is solid and all 8 in-bounds neighbors are solid
    pub fn is_interior_wall(&self, tx: i32, ty: i32) -> bool {
        if !self.is_solid(tx, ty) {
            return false;
        }
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (tx + dx, ty + dy);
                if self.in_bounds(nx, ny) && self.is_floor(nx, ny) {
                    return false;
                }
            }
        }
        true
    }

    /// Pixel-space solidity; out-of-bounds counts as solid (hard boundary)
    pub fn is_solid_at_pixel(&self, px: f32, py: f32) -> bool {
        let tx = (px / TILE).floor() as i32;
        let ty = (py / TILE).floor() as i32;
        self.is_solid(tx, ty)
    }

    /// Random floor tile center at least `min_dist` from `from`.
    ///
    /// Bounded rejection sampling: after [`FLOOR_SAMPLE_ATTEMPTS`] tries the
    /// farthest candidate seen wins, so under pathological density this may
    /// legitimately return a close point. An empty floor list returns `from`.
    pub fn random_floor_far(&self, rng: &mut Pcg32, from: Vec2, min_dist: f32) -> Vec2 {
        if self.floor.is_empty() {
            return from;
        }
        let min_d2 = min_dist * min_dist;
        let mut best = None;
        let mut best_d2 = -1.0;
        for _ in 0..FLOOR_SAMPLE_ATTEMPTS {
            let (tx, ty) = self.floor[rng.random_range(0..self.floor.len())];
            let p = Vec2::new(tx as f32 * TILE + TILE / 2.0, ty as f32 * TILE + TILE / 2.0);
            let d2 = dist_sq(p, from);
            if d2 >= min_d2 {
                return p;
            }
            if d2 > best_d2 {
                best_d2 = d2;
                best = Some(p);
            }
        }
        best.unwrap_or(from)
    }

    /// Random floor tile center at least [`SAFE_SPAWN_DIST`] from `from`
    pub fn random_spawn_point(&self, rng: &mut Pcg32, from: Vec2) -> Vec2 {
        self.random_floor_far(rng, from, SAFE_SPAWN_DIST)
    }
}

use macroquad::prelude::*;
use ndarray::Array1;
use salmon_run::simulation::ecosystem::Ecosystem;
use salmon_run::simulation::gating::GatingDevice;
use salmon_run::simulation::genome::{Sex, SizePhenotype};
use salmon_run::simulation::geometric_utils::Region;
use salmon_run::simulation::params::Params;
use salmon_run::simulation::placement::SiteKind;

/// World to screen mapping, recomputed every frame so resizing works.
pub struct View {
    origin: [f32; 2],
    world_height: f32,
    scale: f32,
}

impl View {
    pub fn new(params: &Params) -> Self {
        let grid = &params.grid;
        let world_width = grid.width as f32 * grid.cell_size;
        let world_height = grid.height as f32 * grid.cell_size;
        let scale = (screen_width() / world_width).min(screen_height() / world_height);
        Self {
            origin: grid.origin,
            world_height,
            scale,
        }
    }

    /// Screen position of a world position; world y points up.
    pub fn to_screen(&self, pos: &Array1<f32>) -> Vec2 {
        vec2(
            (pos[0] - self.origin[0]) * self.scale,
            (self.world_height - (pos[1] - self.origin[1])) * self.scale,
        )
    }

    /// World position under a screen position.
    pub fn to_world(&self, screen: Vec2) -> Array1<f32> {
        Array1::from_vec(vec![
            screen.x / self.scale + self.origin[0],
            self.world_height - screen.y / self.scale + self.origin[1],
        ])
    }

    pub fn length(&self, world_length: f32) -> f32 {
        world_length * self.scale
    }

    fn draw_region(&self, region: &Region, color: Color, filled: bool) {
        let top_left = self.to_screen(&Array1::from_vec(vec![region.min[0], region.max[1]]));
        let [w, h] = region.size();
        if filled {
            draw_rectangle(top_left.x, top_left.y, self.length(w), self.length(h), color);
        } else {
            draw_rectangle_lines(top_left.x, top_left.y, self.length(w), self.length(h), 2.0, color);
        }
    }
}

pub fn draw_field(ecosystem: &Ecosystem, view: &View) {
    let Some(field) = ecosystem.field() else {
        return;
    };
    let color = Color::from_rgba(120, 160, 220, 120);
    for index in 0..field.width() * field.height() {
        let (x, y) = field.coords_of(index);
        let Some(vector) = field.vector(x, y) else {
            continue;
        };
        let center = field.cell_center_world(x, y);
        let tip = &center + &(Array1::from_vec(vector.to_vec()) * (field.cell_size() * 0.4));
        let a = view.to_screen(&center);
        let b = view.to_screen(&tip);
        draw_line(a.x, a.y, b.x, b.y, 1.0, color);
    }
}

pub fn draw_regions(ecosystem: &Ecosystem, view: &View) {
    let params = ecosystem.params();
    view.draw_region(&params.spawn_area, Color::from_rgba(80, 200, 120, 60), true);
    view.draw_region(&params.goal.region, Color::from_rgba(240, 180, 60, 60), true);

    for site in ecosystem.placement().sites() {
        let color = match (&site.kind, site.is_occupied()) {
            (_, true) => GRAY,
            (SiteKind::DamSite(_), false) => Color::from_rgba(90, 60, 30, 200),
            (SiteKind::TowerPad, false) => DARKGREEN,
        };
        view.draw_region(&site.area, color, false);
    }
}

pub fn draw_devices(ecosystem: &Ecosystem, view: &View) {
    for (_, device) in ecosystem.devices() {
        match device {
            GatingDevice::Dam(dam) => {
                let color = if dam.has_ladder() {
                    Color::from_rgba(150, 110, 60, 220)
                } else {
                    Color::from_rgba(110, 70, 30, 220)
                };
                view.draw_region(&dam.contact_zone, color, true);
            }
            GatingDevice::FishingTower(tower) => {
                let p = view.to_screen(&tower.pos);
                draw_circle_lines(p.x, p.y, view.length(tower.effect_radius), 1.0, RED);
                let lit = tower.attempt().is_some_and(|a| a.flash_visible());
                draw_circle(p.x, p.y, view.length(0.6), if lit { ORANGE } else { MAROON });
            }
            GatingDevice::RegulationTower(tower) => {
                let p = view.to_screen(&tower.pos);
                draw_circle_lines(p.x, p.y, view.length(tower.effect_radius), 1.0, BLUE);
                let lit = tower.attempt().is_some_and(|a| a.flash_visible());
                draw_circle(p.x, p.y, view.length(0.6), if lit { SKYBLUE } else { DARKBLUE });
            }
        }
    }
}

pub fn draw_fish(ecosystem: &Ecosystem, view: &View) {
    for fish in ecosystem.school().active() {
        let p = view.to_screen(&fish.pos);
        let radius = view.length(match fish.size() {
            SizePhenotype::Small => 0.2,
            SizePhenotype::Medium => 0.3,
            SizePhenotype::Large => 0.4,
        });
        let color = match (fish.sex(), fish.is_stuck(), fish.is_being_caught()) {
            (_, _, true) => RED,
            (_, true, _) => GRAY,
            (Sex::Female, ..) => PINK,
            (Sex::Male, ..) => SKYBLUE,
        };
        draw_circle(p.x, p.y, radius, color);

        // heading; screen y is flipped
        let tip = vec2(fish.heading.cos(), -fish.heading.sin()) * radius * 1.8;
        draw_line(p.x, p.y, p.x + tip.x, p.y + tip.y, 1.0, BLACK);
    }
}

pub fn draw_hud(ecosystem: &Ecosystem) {
    let counts = ecosystem.population();
    let mut lines = vec![
        format!(
            "Turn {}  |  {}  |  {:?}",
            ecosystem.turn(),
            ecosystem.phase_name(),
            ecosystem.time().speed()
        ),
        format!(
            "active {}  arrived {}  dead {}  waiting {}",
            counts.active,
            counts.successful,
            counts.dead,
            ecosystem.unspawned()
        ),
    ];
    if let Some(summary) = ecosystem.summary() {
        lines.push(format!(
            "last run: {} arrived, {} died ({} caught), {} offspring",
            summary.survived,
            summary.died,
            summary.caught,
            summary.offspring.total()
        ));
    }
    lines.push(
        "Enter: start/advance  R: run  A: abort  Space: pause  1-3: speed  D/L/F/G: place  Q: quit"
            .to_string(),
    );
    lines.extend(
        ecosystem
            .log()
            .events()
            .iter()
            .take(6)
            .map(|event| format!("{:>6.1}s {}", event.time, event.description)),
    );

    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 10.0, 20.0 + i as f32 * 18.0, 18.0, BLACK);
    }
}

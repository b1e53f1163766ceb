use macroquad::prelude::*;
use salmon_run::simulation::ecosystem::Ecosystem;
use salmon_run::simulation::gating::DeviceKind;
use salmon_run::simulation::lifecycle::Phase;
use salmon_run::simulation::observer::GameEvent;
use salmon_run::simulation::params::Params;
use salmon_run::simulation::time::GameSpeed;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod graphics;

const PARAMS_PATH: &str = "params.json";
const FIELD_PATH: &str = "field.json";

fn load_params() -> Params {
    match Params::load_from_file(PARAMS_PATH) {
        Ok(params) => params,
        Err(err) => {
            warn!("using default parameters: {err}");
            Params::default()
        }
    }
}

fn handle_input(ecosystem: &mut Ecosystem, view: &graphics::View) {
    let result = if is_key_pressed(KeyCode::Enter) {
        match ecosystem.phase() {
            Phase::Intro => ecosystem.start(),
            Phase::PostRunSummary => ecosystem.advance(),
            _ => Ok(()),
        }
    } else if is_key_pressed(KeyCode::R) {
        ecosystem.begin_run()
    } else if is_key_pressed(KeyCode::A) {
        ecosystem.abort_run()
    } else if is_key_pressed(KeyCode::Q) {
        ecosystem.quit()
    } else {
        Ok(())
    };
    if let Err(err) = result {
        warn!("{err}");
    }

    let speed = if is_key_pressed(KeyCode::Space) {
        Some(if ecosystem.time().is_paused() {
            GameSpeed::Normal
        } else {
            GameSpeed::Paused
        })
    } else if is_key_pressed(KeyCode::Key1) {
        Some(GameSpeed::Normal)
    } else if is_key_pressed(KeyCode::Key2) {
        Some(GameSpeed::Faster)
    } else if is_key_pressed(KeyCode::Key3) {
        Some(GameSpeed::Fastest)
    } else {
        None
    };
    if let Some(speed) = speed {
        ecosystem.set_speed(speed);
    }

    let kind = [
        (KeyCode::D, DeviceKind::Dam),
        (KeyCode::L, DeviceKind::DamLadder),
        (KeyCode::F, DeviceKind::FishingTower),
        (KeyCode::G, DeviceKind::RegulationTower),
    ]
    .into_iter()
    .find(|(key, _)| is_key_pressed(*key))
    .map(|(_, kind)| kind);

    if let Some(kind) = kind {
        let (x, y) = mouse_position();
        let point = view.to_world(vec2(x, y));
        if let Err(err) = ecosystem.place(kind, &point) {
            warn!("{err}");
        }
    }
}

#[macroquad::main("Salmon Run")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("salmon_run=info")),
        )
        .init();

    let params = load_params();
    let mut ecosystem = match Ecosystem::new(params) {
        Ok(ecosystem) => ecosystem,
        Err(err) => {
            error!("cannot start simulation: {err}");
            return;
        }
    };
    ecosystem.load_field(FIELD_PATH);
    ecosystem.subscribe(|event| {
        if let GameEvent::NewGeneration { parents, offspring } = event {
            info!(
                parents = parents.as_ref().map_or(0, Vec::len),
                offspring = offspring.len(),
                "new generation"
            );
        }
    });

    loop {
        clear_background(Color::from_rgba(200, 225, 240, 255));
        let view = graphics::View::new(ecosystem.params());

        handle_input(&mut ecosystem, &view);
        if let Err(err) = ecosystem.step(get_frame_time()) {
            error!("simulation step failed: {err}");
        }

        graphics::draw_field(&ecosystem, &view);
        graphics::draw_regions(&ecosystem, &view);
        graphics::draw_devices(&ecosystem, &view);
        graphics::draw_fish(&ecosystem, &view);
        graphics::draw_hud(&ecosystem);

        if ecosystem.phase().is_terminal() && is_key_pressed(KeyCode::Escape) {
            break;
        }
        next_frame().await
    }
}

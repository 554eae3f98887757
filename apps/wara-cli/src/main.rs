use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wara_common::Viewport;
use wara_render::{CameraConfig, DebugTextRenderer, OrbitCamera, Renderer, Scene};

#[derive(Parser)]
#[command(name = "wara-cli", about = "Inspect the orbit camera and icon scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the eye position and view-projection matrix for an orientation
    ViewProj {
        #[arg(long, default_value = "-90", allow_hyphen_values = true)]
        yaw: f32,
        #[arg(long, default_value = "-20", allow_hyphen_values = true)]
        pitch: f32,
        #[arg(long, default_value = "5")]
        distance: f32,
        /// Viewport width over height
        #[arg(long, default_value = "1.3333334")]
        aspect: f32,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Apply the same drag delta repeatedly and print the resulting orientation
    Drag {
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dx: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dy: f32,
        #[arg(short, long, default_value = "1")]
        steps: u32,
    },
    /// Simulate frames and print a text rendering of the scene
    Scene {
        #[arg(short, long, default_value = "0")]
        frames: u32,
        /// Seconds per simulated frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
    },
}

#[derive(Debug, Serialize)]
struct ViewProjReport {
    yaw: f32,
    pitch: f32,
    distance: f32,
    aspect: f32,
    eye: [f32; 3],
    /// Column-major, as uploaded to the GPU.
    view_proj: [[f32; 4]; 4],
}

fn camera_at(yaw: f32, pitch: f32, distance: f32) -> anyhow::Result<OrbitCamera> {
    let config = CameraConfig {
        initial_yaw_degrees: yaw,
        initial_pitch_degrees: pitch,
        initial_distance: distance,
        min_distance: distance.min(CameraConfig::default().min_distance),
        max_distance: distance.max(CameraConfig::default().max_distance),
        ..CameraConfig::default()
    };
    config.validate()?;
    Ok(OrbitCamera::new(config))
}

fn view_proj_report(camera: &OrbitCamera, aspect: f32) -> anyhow::Result<ViewProjReport> {
    if !(aspect.is_finite() && aspect > 0.0) {
        anyhow::bail!("aspect ratio must be positive, got {aspect}");
    }
    Ok(ViewProjReport {
        yaw: camera.yaw(),
        pitch: camera.pitch(),
        distance: camera.distance(),
        aspect,
        eye: camera.eye_position().to_array(),
        view_proj: camera.view_proj(aspect).to_cols_array_2d(),
    })
}

fn format_matrix(m: &Mat4) -> String {
    // Print rows so the output reads like the math.
    (0..4)
        .map(|r| {
            let row = m.row(r);
            format!(
                "  [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]",
                row.x, row.y, row.z, row.w
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("wara-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", wara_render::crate_info());
            println!("input: {}", wara_input::crate_info());
            let camera = OrbitCamera::default();
            println!(
                "default camera: yaw={} pitch={} distance={}",
                camera.yaw(),
                camera.pitch(),
                camera.distance()
            );
        }
        Commands::ViewProj {
            yaw,
            pitch,
            distance,
            aspect,
            json,
        } => {
            let camera = camera_at(yaw, pitch, distance)?;
            let report = view_proj_report(&camera, aspect)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let eye = Vec3::from_array(report.eye);
                println!(
                    "yaw={:.2} pitch={:.2} distance={:.2} aspect={:.4}",
                    report.yaw, report.pitch, report.distance, report.aspect
                );
                println!("eye=({:.4}, {:.4}, {:.4})", eye.x, eye.y, eye.z);
                println!("view_proj=");
                println!(
                    "{}",
                    format_matrix(&Mat4::from_cols_array_2d(&report.view_proj))
                );
            }
        }
        Commands::Drag { dx, dy, steps } => {
            let mut camera = OrbitCamera::default();
            println!(
                "start: yaw={:.2} pitch={:.2}",
                camera.yaw(),
                camera.pitch()
            );
            for _ in 0..steps {
                camera.handle_drag(dx, dy);
            }
            tracing::debug!(steps, "applied drags");
            println!(
                "after {steps} x ({dx}, {dy}): yaw={:.2} pitch={:.2}",
                camera.yaw(),
                camera.pitch()
            );
            let eye = camera.eye_position();
            println!("eye=({:.4}, {:.4}, {:.4})", eye.x, eye.y, eye.z);
        }
        Commands::Scene {
            frames,
            dt,
            width,
            height,
        } => {
            let mut scene = Scene::default();
            for _ in 0..frames {
                scene.update(dt);
            }
            let camera = OrbitCamera::default();
            let output =
                DebugTextRenderer::new().render(&scene, &camera, Viewport::new(width, height));
            print!("{output}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_for_reference_orientation() {
        let camera = camera_at(-90.0, 0.0, 5.0).unwrap();
        let report = view_proj_report(&camera, 1.0).unwrap();
        let eye = Vec3::from_array(report.eye);
        assert!(eye.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-4));
        assert_eq!(
            Mat4::from_cols_array_2d(&report.view_proj),
            camera.view_proj(1.0)
        );
    }

    #[test]
    fn report_serializes_to_json() {
        let camera = OrbitCamera::default();
        let report = view_proj_report(&camera, 2.0).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["aspect"], 2.0);
        assert_eq!(json["view_proj"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn non_positive_aspect_is_rejected() {
        let camera = OrbitCamera::default();
        assert!(view_proj_report(&camera, 0.0).is_err());
        assert!(view_proj_report(&camera, -1.0).is_err());
    }

    #[test]
    fn distances_outside_zoom_range_are_honored() {
        let camera = camera_at(0.0, 0.0, 80.0).unwrap();
        assert_eq!(camera.distance(), 80.0);
    }

    #[test]
    fn negative_angles_parse() {
        let cli =
            Cli::try_parse_from(["wara-cli", "view-proj", "--yaw", "-45", "--pitch", "-10"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::ViewProj { yaw, pitch, .. } if yaw == -45.0 && pitch == -10.0
        ));
    }
}

use argh::FromArgs;
use std::path::PathBuf;

use turnscan::{
    core::CameraId,
    io::BmpDirectorySource,
    k3d::{calibration::StereoCalibration, io::points3d::read_points3d, pointcloud::ScanCloud},
    load_json_file, ScanConfig, ScanSession,
};

#[derive(FromArgs)]
/// Reconstruct a point cloud from turntable laser frames
struct Args {
    /// directory holding Images_A/<step>.bmp and Images_B/<step>.bmp
    #[argh(option, short = 'f')]
    frames_dir: Option<PathBuf>,

    /// path to a JSON session configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// path to a JSON stereo calibration
    #[argh(option, short = 'k')]
    calibration: Option<PathBuf>,

    /// path to the output .3dps file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// load and summarize a .3dps file instead of scanning
    #[argh(option, short = 'l')]
    load: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if let Some(path) = args.load {
        let cloud = read_points3d(&path)?;
        print_summary(&cloud);
        return Ok(());
    }

    let Some(frames_dir) = args.frames_dir else {
        return Err("either --frames-dir or --load is required".into());
    };

    let config = match args.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    let calibration: StereoCalibration = match args.calibration {
        Some(path) => load_json_file(path)?,
        None => StereoCalibration::default(),
    };

    let mut session = ScanSession::new(config, calibration)?;
    session.run(&mut BmpDirectorySource::new(&frames_dir))?;

    for camera in CameraId::ALL {
        let state = session.camera(camera);
        state.dump_2d();
        state.dump_3d();
    }

    let cloud = session.cloud();
    print_summary(&cloud);

    if let Some(output) = args.output {
        session.save(&output)?;
        println!("Saved to {}", output.display());
    } else {
        log::warn!("No --output given, the points were not saved");
    }

    Ok(())
}

fn print_summary(cloud: &ScanCloud) {
    println!(
        "camera A: #{} points, camera B: #{} points",
        cloud.points(CameraId::A).len(),
        cloud.points(CameraId::B).len()
    );
    if let Some((lo, hi)) = cloud.bounds() {
        println!("bounds: min {lo:?} max {hi:?}");
    }
}

use std::path::Path;

use turnscan_3d::{
    calibration::{CameraCalibration, StereoCalibration},
    io::points3d::write_points3d,
    pointcloud::ScanCloud,
    triangulation::{translate_points, TranslateSummary, TriangulationParams},
};
use turnscan_core::{BoundedPointList, CameraId, Pixel2d, Point3d};
use turnscan_image::{Frame, ImageSize};
use turnscan_imgproc::laser::{extract_laser_points, LaserParams};
use turnscan_io::FrameSource;

use crate::{config::ScanConfig, error::ScanError};

/// Counts of one camera for one rotation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepSummary {
    /// Laser centroids extracted from the frame.
    pub extracted: usize,
    /// Outcome of the translation of the pending centroids.
    pub translated: TranslateSummary,
}

/// The scan state owned by one camera.
///
/// The i-th centroid of `pixels` produced the i-th point of `points`. The cursor
/// counts the centroids already translated, it never exceeds the number of centroids.
/// Centroids past the cursor all belong to one step until they are translated.
#[derive(Debug, Clone)]
pub struct CameraState {
    camera: CameraId,
    calibration: CameraCalibration,
    pixels: BoundedPointList<Pixel2d>,
    points: BoundedPointList<Point3d>,
    cursor: usize,
    last_step: Option<u32>,
    pending_step: Option<u32>,
}

impl CameraState {
    /// Create an empty state whose point lists hold at most `max_points` points.
    pub fn new(camera: CameraId, calibration: CameraCalibration, max_points: usize) -> Self {
        Self {
            camera,
            calibration,
            pixels: BoundedPointList::new(max_points),
            points: BoundedPointList::new(max_points),
            cursor: 0,
            last_step: None,
            pending_step: None,
        }
    }

    /// The camera this state belongs to.
    pub fn camera(&self) -> CameraId {
        self.camera
    }

    /// The calibration of the camera.
    pub fn calibration(&self) -> &CameraCalibration {
        &self.calibration
    }

    /// The extracted laser centroids.
    pub fn pixels(&self) -> &BoundedPointList<Pixel2d> {
        &self.pixels
    }

    /// The reconstructed points.
    pub fn points(&self) -> &BoundedPointList<Point3d> {
        &self.points
    }

    /// Number of centroids already translated.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn check_step(&self, step: u32) -> Result<(), ScanError> {
        if let Some(last) = self.last_step.filter(|&last| step < last) {
            return Err(ScanError::StepOutOfOrder {
                camera: self.camera,
                step,
                last,
            });
        }
        if self.cursor < self.pixels.len() {
            if let Some(pending) = self.pending_step.filter(|&pending| pending != step) {
                return Err(ScanError::PendingStep {
                    camera: self.camera,
                    step,
                    pending,
                });
            }
        }
        Ok(())
    }

    /// Extract the laser centroids of a frame and append them to the 2D list.
    ///
    /// # Errors
    ///
    /// [`ScanError::PendingStep`] if centroids of another step are not translated yet.
    ///
    /// # Returns
    ///
    /// The number of centroids appended.
    pub fn extract(
        &mut self,
        frame: &Frame,
        step: u32,
        params: &LaserParams,
        expected_size: ImageSize,
    ) -> Result<usize, ScanError> {
        self.check_step(step)?;
        let res = extract_laser_points(frame, expected_size, params, &mut self.pixels);
        // points pushed before a failure still belong to this step
        if self.cursor < self.pixels.len() {
            self.pending_step = Some(step);
        }
        let n = res.map_err(|source| ScanError::Extraction {
            camera: self.camera,
            step,
            source,
        })?;
        log::debug!("{}: step {step} extracted {n} points", self.camera);
        Ok(n)
    }

    /// Translate the centroids appended since the last call, tagging them with `step`.
    pub fn translate(
        &mut self,
        step: u32,
        params: &TriangulationParams,
    ) -> Result<TranslateSummary, ScanError> {
        self.check_step(step)?;
        let summary = translate_points(
            self.camera,
            step,
            &self.calibration,
            params,
            &self.pixels,
            &mut self.cursor,
            &mut self.points,
        )
        .map_err(|source| ScanError::Capacity {
            camera: self.camera,
            step,
            source,
        })?;
        self.last_step = Some(step);
        self.pending_step = None;
        Ok(summary)
    }

    /// Extract then translate one frame.
    pub fn process(
        &mut self,
        frame: &Frame,
        step: u32,
        config: &ScanConfig,
    ) -> Result<StepSummary, ScanError> {
        let extracted = self.extract(frame, step, &config.laser_params(), config.image_size())?;
        let translated = self.translate(step, &config.triangulation_params())?;
        Ok(StepSummary {
            extracted,
            translated,
        })
    }

    /// Log every stored centroid at trace level.
    pub fn dump_2d(&self) {
        log::trace!("{} has {} coord.", self.camera, self.pixels.len());
        for p in &self.pixels {
            log::trace!("\tX: {}, Y: {}", p.x, p.y);
        }
    }

    /// Log every stored point at trace level.
    pub fn dump_3d(&self) {
        log::trace!("{} has {} points.", self.camera, self.points.len());
        for p in &self.points {
            log::trace!("X: {:.6}, Y: {:.6}, Z: {:.6}, step: {}", p.x, p.y, p.z, p.step);
        }
    }
}

/// A scanning session over a full turntable revolution.
#[derive(Debug, Clone)]
pub struct ScanSession {
    config: ScanConfig,
    camera_a: CameraState,
    camera_b: CameraState,
}

impl ScanSession {
    /// Create an empty session.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidConfig`] if the configuration does not validate.
    pub fn new(config: ScanConfig, calibration: StereoCalibration) -> Result<Self, ScanError> {
        config.validate()?;
        let camera_a = CameraState::new(CameraId::A, calibration.camera_a, config.max_points);
        let camera_b = CameraState::new(CameraId::B, calibration.camera_b, config.max_points);
        Ok(Self {
            config,
            camera_a,
            camera_b,
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The state of one camera.
    pub fn camera(&self, camera: CameraId) -> &CameraState {
        match camera {
            CameraId::A => &self.camera_a,
            CameraId::B => &self.camera_b,
        }
    }

    /// Process the frames of both cameras for one step.
    ///
    /// The two cameras run in parallel, each extracting before translating.
    pub fn process_step(
        &mut self,
        step: u32,
        frame_a: &Frame,
        frame_b: &Frame,
    ) -> Result<[StepSummary; 2], ScanError> {
        let config = &self.config;
        let (res_a, res_b) = rayon::join(
            || self.camera_a.process(frame_a, step, config),
            || self.camera_b.process(frame_b, step, config),
        );
        Ok([res_a?, res_b?])
    }

    /// Run the whole revolution, steps `0..rev_steps`, pulling frames from `source`.
    ///
    /// Stops at the first error.
    pub fn run<S: FrameSource>(&mut self, source: &mut S) -> Result<(), ScanError> {
        let rev_steps = self.config.rev_steps;
        for step in 0..rev_steps {
            log::info!("Processing step {}/{}", step + 1, rev_steps);
            let frame_a = fetch_frame(source, step, CameraId::A)?;
            let frame_b = fetch_frame(source, step, CameraId::B)?;
            self.process_step(step, &frame_a, &frame_b)?;
        }

        let (num_a, num_b) = self.point_counts();
        log::info!("camera A: {num_a} points, camera B: {num_b} points");
        Ok(())
    }

    /// Number of 3D points of camera A and camera B.
    pub fn point_counts(&self) -> (usize, usize) {
        (self.camera_a.points.len(), self.camera_b.points.len())
    }

    /// Iterate over all 3D points, camera A first.
    pub fn points3d(&self) -> impl Iterator<Item = (CameraId, &Point3d)> {
        self.camera_a
            .points
            .iter()
            .map(|p| (CameraId::A, p))
            .chain(self.camera_b.points.iter().map(|p| (CameraId::B, p)))
    }

    /// Snapshot the 3D points of both cameras.
    pub fn cloud(&self) -> ScanCloud {
        ScanCloud::new(
            self.camera_a.points.as_slice().to_vec(),
            self.camera_b.points.as_slice().to_vec(),
        )
    }

    /// Save the 3D points of both cameras to a `.3dps` file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        write_points3d(path, &self.cloud())?;
        log::info!("Data save completed.");
        Ok(())
    }
}

fn fetch_frame<S: FrameSource>(
    source: &mut S,
    step: u32,
    camera: CameraId,
) -> Result<Frame, ScanError> {
    source
        .frame(step, camera)
        .map_err(|source| ScanError::Frame {
            camera,
            step,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnscan_io::IoError;

    fn small_config() -> ScanConfig {
        ScanConfig {
            rev_steps: 4,
            image_width: 8,
            image_height: 2,
            max_points: 64,
            ..Default::default()
        }
    }

    // a calibration that accepts every column but the vanishing one
    fn open_calibration() -> StereoCalibration {
        let calib = CameraCalibration {
            vp_x: 4,
            vp_y: 100,
            vvp_x: -1,
            vvp_y: 0,
            base_x: 4,
            base_y: 0,
            base_m: 0.0,
            base_b: 0.0,
            wall_edge: 0,
            orientation: 0,
            angle_offset: 0.5,
        };
        StereoCalibration {
            camera_a: calib.clone(),
            camera_b: calib,
        }
    }

    fn stripe(first: usize, last: usize) -> Frame {
        let mut frame = Frame::from_size_val([8, 2].into(), 0).unwrap();
        for x in first..=last {
            frame.set_pixel(x, 1, [255, 255, 255]).unwrap();
        }
        frame
    }

    #[test]
    fn process_step_both_cameras() -> Result<(), ScanError> {
        let mut session = ScanSession::new(small_config(), open_calibration())?;
        let [a, b] = session.process_step(0, &stripe(1, 2), &stripe(5, 6))?;
        assert_eq!(a.extracted, 1);
        assert_eq!(b.extracted, 1);
        assert_eq!(session.point_counts(), (1, 1));
        assert_eq!(session.camera(CameraId::A).pixels().as_slice(), &[Pixel2d::new(1, 1)]);
        assert_eq!(session.camera(CameraId::B).pixels().as_slice(), &[Pixel2d::new(5, 1)]);
        assert_eq!(session.camera(CameraId::A).cursor(), 1);
        Ok(())
    }

    #[test]
    fn translate_twice_is_noop() -> Result<(), ScanError> {
        let config = small_config();
        let mut state = CameraState::new(CameraId::A, open_calibration().camera_a, 16);
        state.extract(&stripe(1, 2), 0, &config.laser_params(), config.image_size())?;

        let first = state.translate(0, &config.triangulation_params())?;
        assert_eq!(first.total(), 1);
        let second = state.translate(0, &config.triangulation_params())?;
        assert_eq!(second.total(), 0);
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.points().len(), 1);
        Ok(())
    }

    #[test]
    fn rejected_points_are_zeroed() -> Result<(), ScanError> {
        let mut session = ScanSession::new(small_config(), open_calibration())?;
        // the centroid lands on the vanishing column 4
        let [a, _] = session.process_step(1, &stripe(4, 4), &stripe(1, 1))?;
        assert_eq!(a.translated.rejected, 1);
        assert_eq!(
            session.camera(CameraId::A).points().as_slice(),
            &[Point3d::zeroed(1)]
        );
        Ok(())
    }

    #[test]
    fn out_of_order_step() -> Result<(), ScanError> {
        let mut session = ScanSession::new(small_config(), open_calibration())?;
        session.process_step(2, &stripe(1, 2), &stripe(1, 2))?;
        let res = session.process_step(1, &stripe(1, 2), &stripe(1, 2));
        assert!(matches!(
            res,
            Err(ScanError::StepOutOfOrder {
                step: 1,
                last: 2,
                ..
            })
        ));
        // nothing was appended by the rejected step
        assert_eq!(session.point_counts(), (1, 1));
        assert_eq!(session.camera(CameraId::A).pixels().len(), 1);
        Ok(())
    }

    #[test]
    fn untranslated_step_blocks_next_step() -> Result<(), ScanError> {
        let config = small_config();
        let (laser, size) = (config.laser_params(), config.image_size());
        let mut state = CameraState::new(CameraId::A, open_calibration().camera_a, 16);

        state.extract(&stripe(1, 2), 0, &laser, size)?;
        let res = state.extract(&stripe(5, 6), 1, &laser, size);
        assert!(matches!(
            res,
            Err(ScanError::PendingStep {
                step: 1,
                pending: 0,
                ..
            })
        ));
        assert_eq!(state.pixels().len(), 1);

        let res = state.translate(1, &config.triangulation_params());
        assert!(matches!(
            res,
            Err(ScanError::PendingStep {
                step: 1,
                pending: 0,
                ..
            })
        ));
        assert_eq!(state.cursor(), 0);

        // a second frame of the same step joins the pending centroids
        state.extract(&stripe(5, 6), 0, &laser, size)?;
        state.translate(0, &config.triangulation_params())?;
        state.extract(&stripe(5, 6), 1, &laser, size)?;
        state.translate(1, &config.triangulation_params())?;

        let steps = state.points().iter().map(|p| p.step).collect::<Vec<_>>();
        assert_eq!(steps, vec![0, 0, 1]);
        Ok(())
    }

    #[test]
    fn session_accessors() -> Result<(), ScanError> {
        let calibration = open_calibration();
        let session = ScanSession::new(small_config(), calibration.clone())?;
        assert_eq!(session.config(), &small_config());
        for camera in CameraId::ALL {
            let state = session.camera(camera);
            assert_eq!(state.camera(), camera);
            assert_eq!(state.calibration(), calibration.get(camera));
            assert!(state.pixels().is_empty());
        }
        Ok(())
    }

    #[test]
    fn wrong_resolution_aborts() -> Result<(), ScanError> {
        let mut session = ScanSession::new(small_config(), open_calibration())?;
        let big = Frame::from_size_val([16, 2].into(), 0).unwrap();
        let res = session.process_step(0, &big, &stripe(1, 2));
        assert!(matches!(
            res,
            Err(ScanError::Extraction {
                camera: CameraId::A,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn capacity_aborts() -> Result<(), ScanError> {
        let config = ScanConfig {
            max_points: 1,
            ..small_config()
        };
        let mut session = ScanSession::new(config, open_calibration())?;
        session.process_step(0, &stripe(1, 2), &stripe(1, 2))?;
        let res = session.process_step(1, &stripe(1, 2), &stripe(1, 2));
        assert!(matches!(res, Err(ScanError::Extraction { .. })));
        assert_eq!(session.point_counts(), (1, 1));
        Ok(())
    }

    #[test]
    fn missing_frame_aborts_run() -> Result<(), ScanError> {
        let mut session = ScanSession::new(small_config(), open_calibration())?;
        let mut source = |step: u32, camera: CameraId| -> Result<Frame, IoError> {
            if step == 2 && camera == CameraId::B {
                return Err(IoError::FileDoesNotExist("Images_B/2.bmp".into()));
            }
            Ok(stripe(1, 2))
        };
        let res = session.run(&mut source);
        assert!(matches!(
            res,
            Err(ScanError::Frame {
                camera: CameraId::B,
                step: 2,
                ..
            })
        ));
        assert_eq!(session.point_counts(), (2, 2));
        Ok(())
    }

    #[test]
    fn points3d_camera_a_first() -> Result<(), ScanError> {
        let mut session = ScanSession::new(small_config(), open_calibration())?;
        session.process_step(0, &stripe(1, 2), &stripe(5, 6))?;
        session.process_step(1, &stripe(1, 2), &stripe(5, 6))?;
        let cameras = session.points3d().map(|(c, _)| c).collect::<Vec<_>>();
        assert_eq!(cameras, vec![CameraId::A, CameraId::A, CameraId::B, CameraId::B]);
        assert_eq!(session.cloud().len(), 4);
        Ok(())
    }

    #[test]
    fn invalid_config() {
        let config = ScanConfig {
            rev_steps: 0,
            ..Default::default()
        };
        let res = ScanSession::new(config, StereoCalibration::default());
        assert!(matches!(res, Err(ScanError::InvalidConfig(_))));
    }
}

/// Plain text `.3dps` reader and writer.
pub mod points3d;

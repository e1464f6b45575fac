//! `gdal_rasterize` command-line driver

use std::fs;
use std::process::Command;
use std::time::SystemTime;

use log::{debug, info, warn};

use crate::errors::{RasterError, RasterResult};
use crate::rasterize::{RasterizeParams, VectorRasterizer};

/// Default executable name
pub const GDAL_RASTERIZE: &str = "gdal_rasterize";

/// Runs the `gdal_rasterize` executable
///
/// Arguments are passed as a vector, never through a shell.
#[derive(Debug, Clone)]
pub struct GdalRasterize {
    binary: String,
}

impl Default for GdalRasterize {
    fn default() -> Self {
        Self::new()
    }
}

impl GdalRasterize {
    pub fn new() -> Self {
        GdalRasterize {
            binary: GDAL_RASTERIZE.to_string(),
        }
    }

    /// Use a different executable, e.g. an absolute path
    pub fn with_binary(binary: impl Into<String>) -> Self {
        GdalRasterize {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Argument vector for one run
    pub fn arguments(params: &RasterizeParams) -> Vec<String> {
        let mut args = vec![
            "-a".to_string(),
            params.attribute_field.clone(),
            "-tr".to_string(),
            params.x_res.to_string(),
            params.y_res.to_string(),
        ];

        if let Some(bbox) = &params.bounding_box {
            args.push("-te".to_string());
            args.extend([bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax].iter().map(|v| v.to_string()));
        }
        if params.target_aligned {
            args.push("-tap".to_string());
        }

        args.extend([
            "-ot".to_string(),
            params.pixel_type.name().to_string(),
            "-of".to_string(),
            params.output_format.clone(),
            "-a_nodata".to_string(),
            params.nodata.to_string(),
            params.input_vector.clone(),
            params.output_raster.clone(),
        ]);
        args
    }

    /// Modification time and size of `path`, `None` when it does not exist
    fn output_stamp(path: &str) -> Option<(SystemTime, u64)> {
        let metadata = fs::metadata(path).ok()?;
        Some((metadata.modified().ok()?, metadata.len()))
    }

    fn failure(&self, status: Option<i32>, stderr: impl Into<String>) -> RasterError {
        RasterError::ExternalToolFailure {
            tool: self.binary.clone(),
            status,
            stderr: stderr.into(),
        }
    }
}

impl VectorRasterizer for GdalRasterize {
    fn run(&self, params: &RasterizeParams) -> RasterResult<()> {
        params.validate()?;
        let args = Self::arguments(params);
        info!("Running {} {}", self.binary, args.join(" "));

        let before = Self::output_stamp(&params.output_raster);
        if before.is_some() {
            debug!("{} already exists and must be rewritten", params.output_raster);
        }

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|e| self.failure(None, format!("failed to start: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(self.failure(output.status.code(), stderr));
        }
        if !stderr.trim().is_empty() {
            warn!("{}: {}", self.binary, stderr.trim());
        }
        debug!("{} stdout: {}", self.binary, String::from_utf8_lossy(&output.stdout).trim());

        let after = Self::output_stamp(&params.output_raster);
        if after.is_none() || after == before {
            return Err(self.failure(output.status.code(),
                                    format!("no output written to {}", params.output_raster)));
        }

        info!("Rasterized {} into {}", params.input_vector, params.output_raster);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::geo_transform::BoundingBox;

    #[test]
    fn arguments_resolution_only() {
        let params = RasterizeParams::with_resolution("in.shp", "out.tif", "code", 10.0, 10.0);
        assert_eq!(GdalRasterize::arguments(&params), vec![
            "-a", "code", "-tr", "10", "10",
            "-ot", "Byte", "-of", "GTiff", "-a_nodata", "0",
            "in.shp", "out.tif",
        ]);
    }

    #[test]
    fn arguments_with_extent() {
        let bbox = BoundingBox::new(100.0, 100.0, 600.0, 500.5).unwrap();
        let params = RasterizeParams::with_resolution("in.gpkg", "out.tif", "code", 10.0, 2.5)
            .bounded_by(bbox)
            .aligned(true);
        assert_eq!(GdalRasterize::arguments(&params), vec![
            "-a", "code", "-tr", "10", "2.5",
            "-te", "100", "100", "600", "500.5", "-tap",
            "-ot", "Byte", "-of", "GTiff", "-a_nodata", "0",
            "in.gpkg", "out.tif",
        ]);
    }

    #[test]
    fn missing_binary_is_a_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("mask.tif");
        let params = RasterizeParams::with_resolution("in.shp", out.to_str().unwrap(), "code", 1.0, 1.0);

        let rasterizer = GdalRasterize::with_binary("/nonexistent/bin/gdal_rasterize");
        match rasterizer.run(&params) {
            Err(RasterError::ExternalToolFailure { tool, status, .. }) => {
                assert_eq!(tool, "/nonexistent/bin/gdal_rasterize");
                assert_eq!(status, None);
            }
            other => panic!("expected tool failure, got {:?}", other),
        }
        assert!(!out.exists());
    }

    #[cfg(unix)]
    #[test]
    fn success_without_output_is_a_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("mask.tif");
        let params = RasterizeParams::with_resolution("in.shp", out.to_str().unwrap(), "code", 1.0, 1.0);

        let rasterizer = GdalRasterize::with_binary("true");
        assert!(matches!(rasterizer.run(&params),
                         Err(RasterError::ExternalToolFailure { status: Some(0), .. })));
    }

    #[cfg(unix)]
    #[test]
    fn stale_output_is_a_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("mask.tif");
        fs::write(&out, b"left over from an earlier run").unwrap();
        let params = RasterizeParams::with_resolution("in.shp", out.to_str().unwrap(), "code", 1.0, 1.0);

        let rasterizer = GdalRasterize::with_binary("true");
        assert!(matches!(rasterizer.run(&params),
                         Err(RasterError::ExternalToolFailure { status: Some(0), .. })));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_tool_failure() {
        let params = RasterizeParams::with_resolution("in.shp", "out.tif", "code", 1.0, 1.0);
        let rasterizer = GdalRasterize::with_binary("false");
        assert!(matches!(rasterizer.run(&params),
                         Err(RasterError::ExternalToolFailure { status: Some(1), .. })));
    }
}

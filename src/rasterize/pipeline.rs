//! Template-aligned mask production

use log::info;

use crate::errors::RasterResult;
use crate::extent::{ExtentResolver, RasterExtent};
use crate::rasterize::{RasterizeParams, VectorRasterizer};

/// Burns vector layers onto the grid of template rasters
pub struct MaskPipeline<R> {
    rasterizer: R,
}

impl<R: VectorRasterizer> MaskPipeline<R> {
    pub fn new(rasterizer: R) -> Self {
        MaskPipeline { rasterizer }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Rasterize `attribute_field` of `input_vector` on the grid of `template`
    ///
    /// The template is resolved before the rasterizer runs, so an unreadable
    /// template never starts the tool.
    pub fn burn(
        &self,
        template: &str,
        input_vector: &str,
        output_raster: &str,
        attribute_field: &str,
    ) -> RasterResult<RasterExtent> {
        let extent = ExtentResolver::resolve(template)?;
        let params = RasterizeParams::with_extent(input_vector, output_raster, attribute_field, &extent);
        params.validate()?;

        info!("Burning '{}' of {} onto the grid of {}", attribute_field, input_vector, template);
        self.rasterizer.run(&params)?;
        Ok(extent)
    }

    /// Rasterize at a fixed resolution, letting the tool pick the extent
    pub fn burn_at_resolution(
        &self,
        input_vector: &str,
        output_raster: &str,
        attribute_field: &str,
        x_res: f64,
        y_res: f64,
    ) -> RasterResult<()> {
        let params = RasterizeParams::with_resolution(input_vector, output_raster, attribute_field, x_res, y_res);
        params.validate()?;
        self.rasterizer.run(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use crate::errors::RasterError;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<RasterizeParams>>,
    }

    impl VectorRasterizer for Recorder {
        fn run(&self, params: &RasterizeParams) -> RasterResult<()> {
            self.calls.borrow_mut().push(params.clone());
            Ok(())
        }
    }

    #[test]
    fn unreadable_template_skips_the_tool() {
        let pipeline = MaskPipeline::new(Recorder::default());
        let result = pipeline.burn("/missing/template.tif", "zones.shp", "mask.tif", "class");

        assert!(matches!(result, Err(RasterError::ResourceNotFound { .. })));
        assert!(pipeline.rasterizer().calls.borrow().is_empty());
    }

    #[test]
    fn resolution_mode_passes_through() {
        let recorder = Recorder::default();
        let pipeline = MaskPipeline::new(&recorder);
        pipeline.burn_at_resolution("zones.shp", "mask.tif", "class", 5.0, 5.0).unwrap();

        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bounding_box, None);
        assert_eq!(calls[0].x_res, 5.0);
    }

    #[test]
    fn invalid_resolution_skips_the_tool() {
        let recorder = Recorder::default();
        let pipeline = MaskPipeline::new(&recorder);
        assert!(pipeline.burn_at_resolution("zones.shp", "mask.tif", "class", -1.0, 5.0).is_err());
        assert!(recorder.calls.borrow().is_empty());
    }
}

use tracing::{debug, info};

use crate::compute::{UpscaleOutput, UpscaleParams, Upscaler};
use crate::error::{Result, SpectraError};
use crate::frame::PlanarImage;
use crate::kernel::{generate, KernelSpec};
use crate::plan::{Precision, TransformPlan, UpscaleRequest};

use super::buffers::{GpuBufferSet, StagingBuffers};
use super::context::GpuContext;
use super::fft::{FftApplication, FftBuffers, FftConfig};
use super::kernel_app::KernelApplication;
use super::scheduler::{PipelineScheduler, RunReport, StageSet};
use super::transfer::{pack_input, unpack_output};

/// Everything bound to one plan. Rebuilt when the image geometry or the
/// sharpen coefficient changes.
struct PlanResources {
    plan: TransformPlan,
    coefficient: f32,
    forward: FftApplication,
    shift: KernelApplication,
    inverse: FftApplication,
    sharpen: KernelApplication,
    staging: StagingBuffers,
    buffers: GpuBufferSet,
}

impl PlanResources {
    fn build(ctx: &GpuContext, plan: TransformPlan, coefficient: f32) -> Result<Self> {
        let buffers = GpuBufferSet::new(ctx, &plan);
        let staging = StagingBuffers::new(ctx, &buffers.sizes());

        let forward = FftApplication::configure(
            ctx,
            &FftConfig::forward(&plan),
            FftBuffers {
                input: &buffers.input,
                temp: &buffers.scratch,
                output: &buffers.working,
            },
        )?;
        let shift = KernelApplication::build(
            ctx,
            &generate(&KernelSpec::shift(&plan)),
            &[&buffers.working, &buffers.scratch],
            plan.shift_grid(),
        )?;
        let inverse = FftApplication::configure(
            ctx,
            &FftConfig::inverse(&plan),
            FftBuffers {
                input: &buffers.scratch,
                temp: &buffers.working,
                output: &buffers.scratch,
            },
        )?;
        let sharpen = KernelApplication::build(
            ctx,
            &generate(&KernelSpec::sharpen(&plan, coefficient)),
            &[&buffers.scratch, &buffers.working],
            plan.sharpen_grid(),
        )?;

        Ok(Self {
            plan,
            coefficient,
            forward,
            shift,
            inverse,
            sharpen,
            staging,
            buffers,
        })
    }

    fn stages(&self) -> StageSet<'_> {
        StageSet {
            forward: &self.forward,
            shift: &self.shift,
            inverse: &self.inverse,
            sharpen: &self.sharpen,
        }
    }
}

/// Device, queue and plan-bound resources owned by one worker thread.
pub struct WorkerContext {
    ctx: GpuContext,
    scheduler: PipelineScheduler,
    resources: Option<PlanResources>,
}

impl WorkerContext {
    pub fn new(device_id: usize, precision: Precision) -> Result<Self> {
        Ok(Self {
            ctx: GpuContext::new(device_id, precision)?,
            scheduler: PipelineScheduler::new(),
            resources: None,
        })
    }

    fn prepare(&mut self, plan: TransformPlan, coefficient: f32) -> Result<&PlanResources> {
        let reusable = self
            .resources
            .as_ref()
            .is_some_and(|r| r.plan == plan && r.coefficient == coefficient);
        if !reusable {
            // Release the old set before allocating the new one.
            self.resources = None;
            self.resources = Some(PlanResources::build(&self.ctx, plan, coefficient)?);
            debug!(device = self.ctx.name(), "Plan resources built");
        }
        self.resources
            .as_ref()
            .ok_or_else(|| SpectraError::Device("plan resources missing".into()))
    }

    /// Upload, run `params.iterations` batches in one submission, download.
    pub fn run(&mut self, image: &PlanarImage, params: &UpscaleParams) -> Result<(UpscaleOutput, RunReport)> {
        if params.precision != self.ctx.precision {
            return Err(SpectraError::Config(format!(
                "worker opened for {} precision, asked for {}",
                self.ctx.precision, params.precision
            )));
        }
        params.validate()?;
        let request = UpscaleRequest {
            width: image.width() as u32,
            height: image.height() as u32,
            channels: image.channels() as u32,
            precision: params.precision,
            upscale: params.factor,
            mode: params.mode,
        };
        let plan = TransformPlan::new(&request, &self.ctx.profile)?;
        self.prepare(plan, params.sharpen)?;

        let Self {
            ctx,
            scheduler,
            resources,
        } = self;
        let res = resources
            .as_ref()
            .ok_or_else(|| SpectraError::Device("plan resources missing".into()))?;

        res.staging
            .upload(ctx, &res.buffers.input, &pack_input(image, &res.plan)?)?;
        let report = scheduler.run(ctx, &res.stages(), params.iterations)?;
        let bytes = res
            .staging
            .download(ctx, &res.buffers.working, res.buffers.sizes().output)?;
        let upscaled = unpack_output(&bytes, &res.plan)?;

        info!(
            device = ctx.name(),
            width = res.plan.output_width(),
            height = res.plan.output_height(),
            per_batch_ms = report.per_batch().as_secs_f64() * 1000.0,
            "Upscale complete"
        );
        Ok((
            UpscaleOutput {
                image: upscaled,
                plan: res.plan.clone(),
                elapsed: report.per_batch(),
            },
            report,
        ))
    }
}

impl Upscaler for WorkerContext {
    fn name(&self) -> &str {
        self.ctx.name()
    }

    fn upscale(&mut self, image: &PlanarImage, params: &UpscaleParams) -> Result<UpscaleOutput> {
        self.run(image, params).map(|(output, _)| output)
    }

    fn device_bytes(&self) -> u64 {
        self.resources
            .as_ref()
            .map_or(0, |r| r.buffers.device_bytes())
    }
}

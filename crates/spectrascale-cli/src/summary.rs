use std::path::Path;
use std::time::Duration;

use console::Style;
use spectrascale_core::batch::{BatchReport, FileStatus};
use spectrascale_core::compute::UpscaleOutput;
use spectrascale_core::consts::BYTES_PER_MIB;
use spectrascale_core::gpu::AdapterSummary;
use spectrascale_core::pipeline::config::UpscaleConfig;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    failed: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            failed: Style::new().red().bold(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn ms(d: Duration) -> String {
    format!("{:.3} ms", d.as_secs_f64() * 1000.0)
}

fn print_settings(s: &Styles, config: &UpscaleConfig) {
    let u = &config.upscale;
    println!("  {}", s.header.apply_to("Upscale"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Factor"),
        s.value.apply_to(format!("{}x", u.factor))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Sharpen"),
        s.value.apply_to(u.sharpen)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Precision"),
        s.method.apply_to(u.precision)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Transform"),
        s.method.apply_to(u.mode)
    );
    if u.iterations > 1 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Iterations"),
            s.value.apply_to(u.iterations)
        );
    }
    println!();
}

pub fn print_upscale_summary(config: &UpscaleConfig, device_name: &str, input: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("SpectraScale"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Device"),
        s.method.apply_to(device_name)
    );
    println!();
    print_settings(&s, config);
}

pub fn print_upscale_result(output: &UpscaleOutput, device_bytes: u64, path: &Path, total: Duration) {
    let s = Styles::new();
    let plan = &output.plan;

    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!(
            "{}x{} -> {}x{}",
            plan.width,
            plan.height,
            plan.output_width(),
            plan.output_height()
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Layout"),
        s.method.apply_to(if plan.real_input { "real input" } else { "complex" })
    );
    if device_bytes > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("VRAM"),
            s.value.apply_to(format!("{} MB", device_bytes / BYTES_PER_MIB))
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Upscale"),
        s.value.apply_to(ms(output.elapsed))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Total"),
        s.value.apply_to(format!("{:.3} s", total.as_secs_f64()))
    );
    println!();
    println!("Output saved to {}", s.path.apply_to(path.display()));
}

pub fn print_batch_summary(config: &UpscaleConfig) {
    let s = Styles::new();
    let b = &config.batch;

    println!();
    println!("  {}", s.title.apply_to("SpectraScale Batch"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(b.input_folder.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(b.output_folder.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Files"),
        s.value.apply_to(b.file_count)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threads"),
        s.value.apply_to(b.threads)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Device"),
        s.method.apply_to(format!(
            "{} (id {})",
            config.device.preference, config.device.device_id
        ))
    );
    println!();
    print_settings(&s, config);
}

pub fn print_batch_report(report: &BatchReport) {
    let s = Styles::new();

    println!();
    for outcome in &report.outcomes {
        let name = outcome.item.input.display();
        match &outcome.status {
            FileStatus::Done { elapsed, width, height } => println!(
                "  {:<24}{} {}",
                s.path.apply_to(name),
                s.value.apply_to(ms(*elapsed)),
                s.label.apply_to(format!("{width}x{height}, worker {}", outcome.worker))
            ),
            FileStatus::Failed { error, .. } => println!(
                "  {:<24}{}",
                s.path.apply_to(name),
                s.failed.apply_to(error)
            ),
            FileStatus::Skipped => println!(
                "  {:<24}{}",
                s.path.apply_to(name),
                s.disabled.apply_to("skipped")
            ),
        }
    }
    println!();
    if report.device_bytes_per_worker > 0 {
        let per = report.device_bytes_per_worker / BYTES_PER_MIB;
        println!(
            "  {:<14}{}",
            s.label.apply_to("VRAM"),
            s.value.apply_to(format!(
                "{per} MB per worker, {} MB total",
                per * report.workers as u64
            ))
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Total time"),
        s.value.apply_to(format!("{:.3} s", report.elapsed.as_secs_f64()))
    );
}

pub fn print_adapters(adapters: &[AdapterSummary]) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("GPU Adapters"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();
    for a in adapters {
        let mut precisions = vec!["single"];
        if a.supports_f64 {
            precisions.push("double");
        }
        if a.supports_f16 {
            precisions.push("half");
        }
        println!(
            "  {:<4}{} {}",
            s.value.apply_to(a.id),
            s.method.apply_to(&a.name),
            s.label.apply_to(format!(
                "[{}, {}, {}] {}",
                a.vendor,
                a.backend,
                a.device_type,
                precisions.join("/")
            ))
        );
    }
    println!();
}

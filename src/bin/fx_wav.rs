//! Offline effect runner.  Reads a wave file, pulls it through one of the
//! effects block by block, and writes the result.  Handy for auditioning the
//! DSP without wiring up a host.
use basicfx_rust::effects::rack::EffectRack;
use basicfx_rust::utils::BoxError;
use clap::Parser;
use log::info;
use simple_error::bail;

const BLOCK_SIZE: usize = 1024;

/// Apply an effect to a wave file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Filename of the input wave
    #[arg(short, long)]
    in_file: String,

    /// Filename for the output
    #[arg(short, long)]
    out_file: String,

    /// Effect to apply: Gain, Delay, or Chorus/Flanger
    #[arg(short, long, default_value = "Delay")]
    effect: String,

    /// Dry/wet mix override (0.0 - 1.0)
    #[arg(short, long)]
    mix: Option<f64>,
}

fn main() -> Result<(), BoxError> {
    env_logger::init();
    let args = Args::parse();

    let mut reader = hound::WavReader::open(&args.in_file)?;
    let spec = reader.spec();
    info!(
        "in_file: {} ({} ch, {} Hz, {} bit)",
        args.in_file, spec.channels, spec.sample_rate, spec.bits_per_sample
    );
    if spec.channels != 1 && spec.channels != 2 {
        bail!(format!("only mono or stereo input, got {} channels", spec.channels));
    }

    // pull everything into f32 stereo frames
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<f32>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<f32>, _>>()?
        }
    };
    let (mut left, mut right): (Vec<f32>, Vec<f32>) = if spec.channels == 2 {
        (
            samples.iter().step_by(2).copied().collect(),
            samples.iter().skip(1).step_by(2).copied().collect(),
        )
    } else {
        (samples.clone(), samples)
    };

    let mut rack = EffectRack::new();
    rack.insert_effect(&args.effect, 0);
    if rack.num_effects() == 0 {
        bail!(format!(
            "unknown effect '{}', options: {}",
            args.effect,
            EffectRack::get_effect_types()
        ));
    }
    rack.prepare(spec.sample_rate as f32, BLOCK_SIZE);
    if let Some(mix) = args.mix {
        rack.change_effect_setting(0, serde_json::json!({"name": "mix", "value": mix}));
    }

    let frames = left.len();
    let mut offset = 0;
    while offset < frames {
        let end = (offset + BLOCK_SIZE).min(frames);
        rack.process(&mut left[offset..end], &mut right[offset..end]);
        offset = end;
    }
    rack.release();
    info!("processed {} frames with {}", frames, args.effect);

    let out_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&args.out_file, out_spec)?;
    for i in 0..frames {
        let l = (left[i].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(l)?;
        if spec.channels == 2 {
            let r = (right[i].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(r)?;
        }
    }
    writer.finalize()?;
    info!("out_file: {}", args.out_file);

    Ok(())
}

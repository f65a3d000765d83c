use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use windpower_core::io::{
    read_efficiency_curve_csv, read_power_coefficient_curve_csv, read_power_curve_csv, read_weather_csv,
};
use windpower_core::wake_losses::WindEfficiencyCurves;
use windpower_core::{
    FarmEfficiency, Meters, ModelChain, ModelChainConfig, ModelChainOutput, TurbineClusterConfig,
    TurbineClusterModelChain, Watts, WindFarm, WindTurbine,
};

/// Wind power model chain demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "windpower-demo")]
#[command(about = "Wind turbine and wind farm power output from weather data", long_about = None)]
struct Args {
    /// Weather CSV (two header rows: variable names and heights)
    #[arg(short, long)]
    weather: Option<PathBuf>,

    /// Power curve CSV (`wind_speed,power`)
    #[arg(long)]
    power_curve: Option<PathBuf>,

    /// Power coefficient curve CSV (`wind_speed,power_coefficient`)
    #[arg(long)]
    cp_curve: Option<PathBuf>,

    /// Turbine type name
    #[arg(long, default_value = "turbine")]
    name: String,

    /// Hub height in m
    #[arg(long, default_value_t = 135.0)]
    hub_height: f64,

    /// Rotor diameter in m (needed for the power coefficient curve)
    #[arg(long)]
    rotor_diameter: Option<f64>,

    /// Nominal power in W (defaults to the power curve maximum)
    #[arg(long)]
    nominal_power: Option<f64>,

    /// Run a wind farm with this many turbines instead of a single turbine
    #[arg(short = 'n', long)]
    number_of_turbines: Option<u32>,

    /// Constant wind farm efficiency
    #[arg(long, conflicts_with = "efficiency_curve")]
    efficiency: Option<f64>,

    /// Wind farm efficiency curve CSV (`wind_speed,efficiency`)
    #[arg(long)]
    efficiency_curve: Option<PathBuf>,

    /// Model chain option as key=value, e.g. `-o density_model=ideal_gas` (repeatable)
    #[arg(short, long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Wind efficiency curve table (`wind_speed` plus one column per curve
    /// name) added to the bundled `dena_mean` curve
    #[arg(long)]
    wind_efficiency_curves: Option<PathBuf>,

    /// List the available wind efficiency curves and exit
    #[arg(long)]
    list_efficiency_curves: bool,
}

fn load_wind_efficiency_curves(args: &Args) -> Result<WindEfficiencyCurves> {
    let mut curves = WindEfficiencyCurves::bundled()?;
    if let Some(path) = &args.wind_efficiency_curves {
        curves.merge(WindEfficiencyCurves::read_csv(path).with_context(|| format!("reading {}", path.display()))?);
    }
    Ok(curves)
}

fn parse_option(option: &str) -> Result<(&str, &str)> {
    option
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .with_context(|| format!("option '{option}' is not of the form key=value"))
}

fn load_turbine(args: &Args) -> Result<WindTurbine> {
    let hub_height = Meters::try_new(args.hub_height)?;
    let power_curve = args
        .power_curve
        .as_ref()
        .map(|path| read_power_curve_csv(path).with_context(|| format!("reading {}", path.display())))
        .transpose()?;
    let nominal_power = match (args.nominal_power, &power_curve) {
        (Some(power), _) => Watts::try_new(power)?,
        (None, Some(curve)) => Watts::new(curve.max_power()),
        (None, None) => bail!("either --nominal-power or --power-curve is needed"),
    };

    let mut turbine = WindTurbine::new(args.name.clone(), hub_height, nominal_power);
    if let Some(curve) = power_curve {
        turbine = turbine.with_power_curve(curve);
    }
    if let Some(path) = &args.cp_curve {
        let curve = read_power_coefficient_curve_csv(path).with_context(|| format!("reading {}", path.display()))?;
        turbine = turbine.with_power_coefficient_curve(curve);
    }
    if let Some(diameter) = args.rotor_diameter {
        turbine = turbine.with_rotor_diameter(Meters::try_new(diameter)?);
    }
    Ok(turbine)
}

fn print_output(output: &ModelChainOutput) {
    println!("time,wind_speed_hub,temperature_hub,density_hub,power_output");
    for i in 0..output.len() {
        let optional = |series: &Option<Vec<f64>>| series.as_ref().map(|s| format!("{:.4}", s[i])).unwrap_or_default();
        println!(
            "{},{:.4},{},{},{:.1}",
            output.index[i],
            output.wind_speed_hub[i],
            optional(&output.temperature_hub),
            optional(&output.density_hub),
            output.power_output[i],
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let wind_efficiency_curves = load_wind_efficiency_curves(&args)?;
    if args.list_efficiency_curves {
        for name in wind_efficiency_curves.names() {
            println!("{name}: {} points", wind_efficiency_curves.get(name)?.wind_speed().len());
        }
        return Ok(());
    }

    let Some(weather_path) = &args.weather else {
        bail!("--weather is required");
    };
    let weather = read_weather_csv(weather_path).with_context(|| format!("reading {}", weather_path.display()))?;
    let turbine = load_turbine(&args)?;

    let output = if let Some(count) = args.number_of_turbines {
        let mut config = TurbineClusterConfig::default();
        for option in &args.options {
            let (key, value) = parse_option(option)?;
            config.set_option(key, value)?;
        }
        let mut farm = WindFarm::new(format!("{} farm", args.name), [(turbine, count)])?;
        if let Some(efficiency) = args.efficiency {
            farm = farm.with_efficiency(FarmEfficiency::constant(efficiency)?);
        } else if let Some(path) = &args.efficiency_curve {
            let curve = read_efficiency_curve_csv(path).with_context(|| format!("reading {}", path.display()))?;
            farm = farm.with_efficiency(FarmEfficiency::Curve(curve));
        }
        let result = TurbineClusterModelChain::new(&farm, config)?
            .with_wind_efficiency_curves(wind_efficiency_curves)
            .run_model(&weather)?;
        tracing::info!(
            installed_power_mw = result.power_curve.installed_power.as_megawatts(),
            mean_hub_height = %result.power_curve.mean_hub_height,
            "Wind farm evaluated"
        );
        result.chain
    } else {
        let mut config = ModelChainConfig::default();
        for option in &args.options {
            let (key, value) = parse_option(option)?;
            config.set_option(key, value)?;
        }
        ModelChain::new(&turbine, config).run_model(&weather)?
    };

    print_output(&output);
    Ok(())
}

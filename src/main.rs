use clap::Parser;
use rebar_combinator::render;
use rebar_combinator::solver::Solver;
use rebar_combinator::types::{SolverConfig, StockItem, WeightSpec};

#[derive(Parser)]
#[command(
    name = "rebar_combinator",
    about = "Rebar cutting-stock combination engine"
)]
struct Cli {
    /// Bar diameter in mm
    #[arg(long)]
    diameter: f64,

    /// Stock items as LENGTHxPIECES (e.g. 12x100 6x40)
    #[arg(long = "stock", num_args = 1..)]
    stock: Vec<String>,

    /// Target cut lengths in meters
    #[arg(long = "targets", num_args = 1.., value_name = "LENGTH")]
    targets: Vec<f64>,

    /// Allowed fractional deviation from a target length
    #[arg(long, default_value_t = 0.1)]
    tolerance: f64,

    /// Material density in kg/m³
    #[arg(long, default_value_t = 7850.0)]
    density: f64,

    /// Show an ASCII cut plan for each combination
    #[arg(long)]
    plan: bool,

    /// Emit the full result as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn parse_stock(s: &str) -> Result<StockItem, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid stock '{}', expected LENGTHxPIECES", s));
    }
    let length = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let pieces = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid piece count in '{}'", s))?;
    if length <= 0.0 {
        return Err(format!("length must be positive in '{}'", s));
    }
    Ok(StockItem::new(length, pieces))
}

fn main() {
    let cli = Cli::parse();

    let stock: Vec<StockItem> = cli
        .stock
        .iter()
        .map(|s| parse_stock(s))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let config = SolverConfig {
        weight: WeightSpec {
            density: cli.density,
        },
        ..SolverConfig::default()
    };
    let solver = Solver::with_config(cli.diameter, cli.tolerance, stock, cli.targets, config);
    let result = solver.solve().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).expect("serialize result")
        );
        return;
    }

    for (i, c) in result.results.iter().enumerate() {
        let lengths = c
            .lengths
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        println!(
            "Combination {}: {}x [{}] -> {:.2}m for target {} (waste {:+.2})",
            i + 1,
            c.quantity,
            lengths,
            c.combined_length,
            c.target,
            c.waste,
        );
        if cli.plan {
            print!("{}", render::render_plan(c));
        }
    }
    if result.results.is_empty() {
        println!("No feasible combinations.");
    }

    let remaining: u32 = result.remaining_stock.iter().map(|s| s.available).sum();
    println!(
        "Summary: {} combination{}, {:.1}% waste by weight ({:.1} kg waste of {:.1} kg), {} piece{} left",
        result.results.len(),
        if result.results.len() == 1 { "" } else { "s" },
        result.total_waste_percentage,
        result.total_waste_weight,
        result.total_commercial_weight,
        remaining,
        if remaining == 1 { "" } else { "s" },
    );
}

use clap::{Parser, Subcommand};
use littlefield_analytics::analysis::{IntervalConfig, ShortageIntervalAnalyzer};
use littlefield_analytics::io::{read_inventory_csv, read_littlefield_csv, write_records};
use littlefield_analytics::logging;
use littlefield_analytics::model::{kits_to_orders, Contract, Station};
use littlefield_analytics::simulation::{CapacityModel, CapacityResult, CapacityScenario};
use littlefield_analytics::strategy::{InventoryPolicyCalculator, PolicyConfig};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "littlefield")]
#[command(about = "Inventory and capacity analytics for Littlefield exports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// EOQ and reorder points from daily demand
    Policy {
        /// Littlefield export (CSV)
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        costs: CostArgs,
    },

    /// Station capacities, bottlenecks and what-if machine additions
    Capacity {
        /// Littlefield export (CSV)
        #[arg(long)]
        data: PathBuf,

        /// Machines at stations 1,2,3
        #[arg(long, value_delimiter = ',', default_value = "1,1,1")]
        machines: Vec<u32>,

        /// First day of the history used to break bottleneck ties
        #[arg(long, default_value = "1")]
        from_day: u32,

        /// Station to add one machine to (1, 2 or 3)
        #[arg(long)]
        add_machine: Option<Station>,

        /// Write the capacity table here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Reorder breaches, shortage runs and the order-quantity correction
    Intervals {
        /// Two-column day,inventory_level file (CSV)
        #[arg(long)]
        inventory: PathBuf,

        /// Reorder threshold in kits
        #[arg(long, default_value = "1440")]
        threshold: f64,

        /// Order quantity currently in use, in kits
        #[arg(long, default_value = "7200")]
        baseline_oq: f64,

        /// Littlefield export used to compute EOQ; baseline only when omitted
        #[arg(long)]
        data: Option<PathBuf>,

        #[command(flatten)]
        costs: CostArgs,

        /// Write the shortage runs here
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct CostArgs {
    /// Cost per order
    #[arg(long, default_value = "1000")]
    order_cost: f64,

    /// Holding cost per kit per year
    #[arg(long, default_value = "1.0")]
    holding_cost: f64,

    /// Supplier lead time in days
    #[arg(long, default_value = "4")]
    lead_time: f64,

    /// Service-level z score
    #[arg(long, default_value = "2.33")]
    z: f64,

    /// Service level probability, e.g. 0.99 (overrides --z)
    #[arg(long)]
    service_level: Option<f64>,
}

impl CostArgs {
    fn to_config(&self) -> Result<PolicyConfig, Box<dyn Error>> {
        let config = PolicyConfig::default()
            .with_order_cost(self.order_cost)
            .with_holding_cost(self.holding_cost)
            .with_lead_time_days(self.lead_time)
            .with_service_z(self.z);
        Ok(match self.service_level {
            Some(p) => config.with_service_level(p)?,
            None => config,
        })
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Policy { data, costs } => run_policy(data, &costs),
        Commands::Capacity {
            data,
            machines,
            from_day,
            add_machine,
            out,
        } => run_capacity(data, &machines, from_day, add_machine, out),
        Commands::Intervals {
            inventory,
            threshold,
            baseline_oq,
            data,
            costs,
            out,
        } => run_intervals(inventory, threshold, baseline_oq, data, &costs, out),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_policy(data: PathBuf, costs: &CostArgs) -> Result<(), Box<dyn Error>> {
    let series = read_littlefield_csv(&data)?;

    println!("=== Business Overview (days {}-{}) ===", series.first_day(), series.last_day());
    for contract in Contract::ALL {
        let summary = series.contract_summary(contract);
        println!(
            "{}: avg revenue ${:.2}, avg lead time {:.2} days, {} kits completed",
            contract, summary.mean_revenue, summary.mean_lead_time, summary.total_completed
        );
    }

    let calc = InventoryPolicyCalculator::new(costs.to_config()?);
    let policy = calc.calculate(&series.demand())?;

    println!("\n=== EOQ and ROP ===");
    println!(
        "EOQ: {:.2} kits ({} orders)",
        policy.eoq.value,
        kits_to_orders(policy.eoq.value)
    );
    for (label, rop) in policy.reorder_points() {
        println!(
            "ROP ({}): {:.2} kits ({} orders)   [{}]",
            label,
            rop.value,
            kits_to_orders(rop.value),
            rop.formula
        );
    }
    if policy.rop_service.is_none() {
        println!("Service-level ROPs: not enough data (need at least 2 days)");
    }
    Ok(())
}

fn run_capacity(
    data: PathBuf,
    machines: &[u32],
    from_day: u32,
    add_machine: Option<Station>,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    if machines.len() != Station::ALL.len() {
        return Err(format!(
            "expected {} machine counts, got {}",
            Station::ALL.len(),
            machines.len()
        )
        .into());
    }
    let counts: Vec<(Station, u32)> = Station::ALL
        .iter()
        .copied()
        .zip(machines.iter().copied())
        .collect();
    let scenario = CapacityScenario::littlefield_default().with_machine_counts(&counts);

    let result = CapacityModel::evaluate(&scenario)?;
    println!("=== Machine Allocation and Bottleneck Detection ===");
    print_capacity(&result);

    if result.has_tied_bottlenecks() {
        let series = read_littlefield_csv(&data)?;
        let history = series.station_history(from_day)?;
        for station in &result.bottleneck_stations {
            if let Some(stats) = history.get(*station) {
                println!(
                    "{} - queue {:.2} kits, utilization {:.2}",
                    station, stats.mean_queue, stats.mean_utilization
                );
            }
        }
        let rec = CapacityModel::recommend(&result, &history)?;
        println!("Recommended station: {} (by {:?})", rec.station, rec.basis);
    }

    let final_result = match add_machine {
        Some(station) => {
            let comparison = CapacityModel::compare(&scenario, station)?;
            println!("\n=== After adding a machine to {} ===", station);
            print_capacity(&comparison.after);
            println!("Cycle time saved: {:.2} hours/job", comparison.cycle_time_saved_hours());
            comparison.after
        }
        None => result,
    };

    if let Some(path) = out {
        write_records(&path, &final_result.rows())?;
    }
    Ok(())
}

fn print_capacity(result: &CapacityResult) {
    for (station, capacity) in &result.capacity_per_station {
        println!("Capacity of {}: {:.2} jobs/day", station, capacity);
    }
    println!("Minimum capacity: {:.2} jobs/day", result.min_capacity);
    println!("Cycle time: {:.2} hours/job", result.cycle_time_hours);
    let names: Vec<String> = result.bottleneck_stations.iter().map(|s| s.to_string()).collect();
    println!("Bottleneck station(s): {}", names.join(", "));
}

fn run_intervals(
    inventory: PathBuf,
    threshold: f64,
    baseline_oq: f64,
    data: Option<PathBuf>,
    costs: &CostArgs,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let points = read_inventory_csv(&inventory)?;
    let config = IntervalConfig::default()
        .with_reorder_threshold(threshold)
        .with_baseline_order_quantity(baseline_oq);
    let analyzer = ShortageIntervalAnalyzer::new(config);
    let analysis = analyzer.analyze(&points)?;

    println!("=== Interval Analysis ===");
    println!("Days when ROP was breached: {:?}", analysis.breach_days);
    let periods: Vec<(u32, u32)> = analysis
        .shortage_runs
        .iter()
        .map(|r| (r.start_day, r.end_day))
        .collect();
    println!("Shortage periods (start, end): {:?}", periods);
    println!("Shortage durations (days): {:?}", analysis.shortage_durations());

    match analysis.average_order_interval {
        Some(avg) => println!("Average order interval: {:.2} days", avg),
        None => println!("Not enough data for average order interval"),
    }
    match analysis.average_shortage_free_period {
        Some(avg) => println!("Average shortage-free period: {:.2} days", avg),
        None => println!("Not enough data for shortage-free period"),
    }
    println!("k value: {:.2}", analysis.k);

    let eoq = match data {
        Some(path) => {
            let series = read_littlefield_csv(&path)?;
            InventoryPolicyCalculator::new(costs.to_config()?)
                .calculate(&series.demand())?
                .eoq
                .value
        }
        None => 0.0,
    };
    println!(
        "Optimized order quantity: {:.2} kits",
        analyzer.optimized_order_quantity(&analysis, eoq)
    );

    if let Some(path) = out {
        write_records(&path, &analysis.shortage_runs)?;
    }
    Ok(())
}

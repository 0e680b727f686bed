//! Composite equipment scenario
//!
//! Builds a chassis holding two floppy disks, nests it with a main disk in an
//! outer chassis, prices the whole assembly and tears it down again.

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, DomainResultExt};
use crate::domain::{EquipmentArena, EquipmentData};

const SCENARIO: &str = "assembly";

/// Output from running the assembly scenario.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    /// Net price of the inner chassis with its two disks
    pub inner_net_price: i64,
    /// Net price of the outer chassis
    pub net_price: i64,
    /// Rendered hierarchy before teardown
    pub tree: String,
    /// Nodes destroyed with the outer chassis, children first
    pub destroyed: Vec<EquipmentData>,
    /// Human-readable trace, in the order things happened
    pub lines: Vec<String>,
}

#[derive(Debug, Default)]
pub struct AssemblyScenario;

impl AssemblyScenario {
    pub fn new() -> Self {
        Self
    }

    #[instrument(level = "debug", skip(self))]
    pub fn run(&self) -> ApplicationResult<AssemblyReport> {
        let mut arena = EquipmentArena::new();
        let mut lines = Vec::new();

        let disk1 = arena
            .new_leaf(1, "Floppy Disk1", 100)
            .in_scenario(SCENARIO, "create disk 1")?;
        let disk2 = arena
            .new_leaf(2, "Floppy Disk2.1", 500)
            .in_scenario(SCENARIO, "create disk 2")?;
        let base = arena
            .new_composite(3, "Base Chassis1.0", 5000)
            .in_scenario(SCENARIO, "create base chassis")?;
        arena.add(base, disk1).in_scenario(SCENARIO, "attach disk 1")?;
        arena.add(base, disk2).in_scenario(SCENARIO, "attach disk 2")?;

        let main_disk = arena
            .new_leaf(4, "Main Disk1", 1000)
            .in_scenario(SCENARIO, "create main disk")?;
        let main = arena
            .new_composite(5, "Main Chassis2.1", 5000)
            .in_scenario(SCENARIO, "create main chassis")?;
        arena.add(main, base).in_scenario(SCENARIO, "nest base chassis")?;
        arena
            .add(main, main_disk)
            .in_scenario(SCENARIO, "attach main disk")?;

        let inner_net_price = arena.net_price(base).in_scenario(SCENARIO, "price base")?;
        let net_price = arena.net_price(main).in_scenario(SCENARIO, "price assembly")?;
        lines.push(format!("Net price of base chassis is: {}", inner_net_price));
        lines.push(format!("Net price of assembly is: {}", net_price));

        let tree = arena
            .to_tree(main)
            .in_scenario(SCENARIO, "render assembly")?
            .to_string();
        lines.extend(tree.lines().map(str::to_string));

        let destroyed = arena.destroy(main).in_scenario(SCENARIO, "destroy assembly")?;
        lines.extend(destroyed.iter().map(|d| format!("Destroying {}", d)));
        debug!("assembly: {} nodes left in arena", arena.len());

        Ok(AssemblyReport {
            inner_net_price,
            net_price,
            tree,
            destroyed,
            lines,
        })
    }
}

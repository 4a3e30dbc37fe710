use std::fmt::Display;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    quantity::{energy::KilowattHours, power::Kilowatts, ratios::Percentage},
    statistics::{load::LoadStatistics, summary::Summary},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn value_cell(value: impl Display) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn optional_cell(value: Option<impl Display>) -> Cell {
    match value {
        Some(value) => value_cell(value),
        None => value_cell("n/a").add_attribute(Attribute::Dim),
    }
}

pub fn build_summary_table(summary: &Summary) -> Table {
    let sustainability = summary.sustainability;
    let mut table = new_table();
    table.set_header(vec!["Storage", ""]);
    table.add_row(vec![Cell::new("Initial energy"), value_cell(summary.initial_energy)]);
    table.add_row(vec![Cell::new("Final energy"), value_cell(summary.final_energy)]);
    table.add_row(vec![
        Cell::new(if sustainability.is_sustainable() { "Sustainable" } else { "Unsustainable" }),
        value_cell(sustainability.difference()).fg(if sustainability.is_sustainable() {
            Color::Green
        } else {
            Color::Red
        }),
    ]);
    table.add_row(vec![
        Cell::new("Peak storage power").add_attribute(Attribute::Dim),
        value_cell(summary.peak_storage_power),
    ]);
    table.add_row(vec![Cell::new("Surplus time"), optional_cell(summary.surplus_time)]);
    table.add_row(vec![Cell::new("Deficit time"), optional_cell(summary.deficit_time)]);
    let grid_draw = summary.grid_energy.import;
    table.add_row(vec![
        Cell::new("Grid draw"),
        value_cell(grid_draw)
            .fg(if grid_draw > KilowattHours::ZERO { Color::Red } else { Color::Green }),
    ]);
    table.add_row(vec![Cell::new("Grid supply"), value_cell(summary.grid_energy.export)]);
    table
}

pub fn build_source_mix_table(summary: &Summary) -> Table {
    let shares = summary.source_mix.map(|mix| mix.map(Some)).unwrap_or_default();
    let mut table = new_table();
    table.set_header(vec!["Source", "Power", "Share"]);
    for (name, power, share, color) in [
        ("Generation", summary.sources.generation, shares.generation, Color::Green),
        ("Storage", summary.sources.storage, shares.storage, Color::DarkYellow),
        ("Grid", summary.sources.grid, shares.grid, Color::Red),
    ] {
        table.add_row(vec![
            Cell::new(name).fg(color),
            value_cell(power),
            optional_cell(share),
        ]);
    }
    table.add_row(vec![
        Cell::new("Load").add_attribute(Attribute::Bold),
        value_cell(summary.total_load).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table
}

/// Load statistics, preceded by the peaks of the summed components.
pub fn build_load_table(
    statistics: &LoadStatistics,
    component_peaks: &[(String, Kilowatts)],
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Load", ""]);
    for (name, peak) in component_peaks {
        table.add_row(vec![
            Cell::new(format!("Peak of {name}")).add_attribute(Attribute::Dim),
            value_cell(*peak),
        ]);
    }
    table.add_row(vec![Cell::new("Peak"), value_cell(statistics.peak)]);
    table.add_row(vec![
        Cell::new("Average daily energy"),
        optional_cell(statistics.average_daily_energy),
    ]);
    table.add_row(vec![
        Cell::new("Full days").add_attribute(Attribute::Dim),
        value_cell(statistics.n_full_days),
    ]);
    table
}

pub fn build_generation_table(peak: Kilowatts, generating_time: Option<Percentage>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Generation", ""]);
    table.add_row(vec![Cell::new("Peak"), value_cell(peak)]);
    table.add_row(vec![Cell::new("Generating time"), optional_cell(generating_time)]);
    table
}

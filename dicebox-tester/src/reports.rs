use std::io::Write;

use anyhow::Result;
use colored::Colorize;

use crate::simulation::SimulationReport;

pub fn generate_console_report(
    writer: &mut dyn Write,
    report: &SimulationReport,
    violations: &[String],
    verbose: bool,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Streak Simulation Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "============================".cyan())?;
    writeln!(writer, "Seed: {}", report.seed)?;
    writeln!(
        writer,
        "Days: {} ({} rolls/day)",
        report.days, report.rolls_per_day
    )?;
    writeln!(
        writer,
        "Streak: {} → {}",
        report.initial_streak,
        report.final_streak.to_string().green()
    )?;
    writeln!(writer, "Winning days: {}", report.winning_days)?;
    if report.days > 0 {
        let rate = f64::from(report.winning_days) / f64::from(report.days) * 100.0;
        writeln!(writer, "Win rate: {rate:.1}%")?;
    }
    let unlocked = if report.unlocked.is_empty() {
        "none".to_string()
    } else {
        report
            .unlocked
            .iter()
            .map(|skin| skin.id())
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(writer, "Unlocked skins: {}", unlocked.yellow())?;
    writeln!(writer, "Current skin: {}", report.current_skin)?;
    writeln!(writer, "History entries: {}", report.history_len)?;

    if verbose {
        writeln!(writer)?;
        for record in &report.records {
            let marker = if record.won {
                "★".green()
            } else if record.daily_face.is_some() {
                "·".normal()
            } else {
                "-".dimmed()
            };
            let faces = record
                .faces
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            write!(
                writer,
                "{marker} day {:>3} {} streak {:>3}  [{faces}]",
                record.day, record.date, record.streak_count
            )?;
            for skin in &record.claimed {
                write!(writer, "  {}", format!("unlocked {skin}").bright_magenta())?;
            }
            writeln!(writer)?;
        }
    }

    writeln!(writer)?;
    if violations.is_empty() {
        writeln!(writer, "{}", "✅ All invariants held".green())?;
    } else {
        writeln!(writer, "{}", "❌ Invariant violations".red().bold())?;
        for violation in violations {
            writeln!(writer, "   - {violation}")?;
        }
    }
    Ok(())
}

pub fn generate_json_report(
    writer: &mut dyn Write,
    report: &SimulationReport,
    violations: &[String],
) -> Result<()> {
    let value = serde_json::json!({
        "report": report,
        "violations": violations,
        "passed": violations.is_empty(),
    });
    serde_json::to_writer_pretty(&mut *writer, &value)?;
    writeln!(writer)?;
    Ok(())
}

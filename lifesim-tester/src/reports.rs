use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use crate::runner::SeedSummary;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    seeds: &'a [SeedSummary],
    total_lives: usize,
    average_age_at_death: Option<f64>,
}

fn lives(seeds: &[SeedSummary]) -> impl Iterator<Item = &crate::runner::LifeSummary> {
    seeds.iter().flat_map(|seed| seed.lives.iter())
}

/// Mean age at death across every life, if any were played.
#[must_use]
pub fn average_age(seeds: &[SeedSummary]) -> Option<f64> {
    let (count, total) = lives(seeds).fold((0u32, 0u64), |(count, total), life| {
        (count + 1, total + u64::from(life.age_at_death))
    });
    #[allow(clippy::cast_precision_loss)]
    let average = (count > 0).then(|| total as f64 / f64::from(count));
    average
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, seeds: &[SeedSummary]) -> Result<()> {
    let report = JsonReport {
        seeds,
        total_lives: lives(seeds).count(),
        average_age_at_death: average_age(seeds),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    seeds: &[SeedSummary],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Life Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;
    writeln!(out, "Lives played: {}", lives(seeds).count())?;
    if let Some(average) = average_age(seeds) {
        writeln!(out, "Average age at death: {average:.1}")?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for seed in seeds {
        writeln!(out, "{} {}", "🌱 Seed".bold(), seed.seed.to_string().bold())?;
        writeln!(
            out,
            "   Archive: {} lives | Legacy: {} points over {} lives | Highscores: {}",
            seed.archived_lives, seed.legacy_currency, seed.legacy_total_lives, seed.highscores
        )?;
        for life in &seed.lives {
            let money = if life.final_money < 0 {
                life.final_money.to_string().red()
            } else {
                life.final_money.to_string().green()
            };
            writeln!(
                out,
                "   • {} died at {} ({}) with {} | {} | {}",
                life.name.bold(),
                life.age_at_death,
                life.cause_of_death,
                money,
                life.education,
                life.job_title.as_deref().unwrap_or("unemployed")
            )?;
            writeln!(
                out,
                "     children {} | marriages {} | crimes {} | minigames {} | +{} legacy",
                life.children, life.marriages, life.crimes, life.minigames, life.legacy_earned
            )?;
            if !life.bonuses_bought.is_empty() {
                writeln!(out, "     bonuses: {}", life.bonuses_bought.join(", ").yellow())?;
            }
            if life.resumed {
                writeln!(out, "     {}", "resumed from save".dimmed())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::LifeSummary;
    use std::path::PathBuf;

    fn life(age: u32) -> LifeSummary {
        LifeSummary {
            seed: 1,
            life: 0,
            name: "Alex".into(),
            resumed: false,
            age_at_death: age,
            cause_of_death: "old age".into(),
            final_money: -50,
            peak_money: 1_000,
            education: "highschool".into(),
            job_title: None,
            children: 1,
            marriages: 1,
            crimes: 0,
            minigames: 2,
            refused_decisions: 0,
            legacy_earned: 0,
            bonuses_bought: vec!["sharp_mind".into()],
            highlights: Vec::new(),
        }
    }

    fn summary() -> Vec<SeedSummary> {
        vec![SeedSummary {
            seed: 1,
            data_dir: PathBuf::from("target/lifesim"),
            lives: vec![life(70), life(80)],
            archived_lives: 2,
            legacy_currency: 0,
            legacy_total_lives: 2,
            highscores: 1,
        }]
    }

    #[test]
    fn average_age_ignores_empty_runs() {
        assert!(average_age(&[]).is_none());
        assert!((average_age(&summary()).unwrap() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn json_report_lists_every_life() {
        let mut out = Vec::new();
        generate_json_report(&mut out, &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["total_lives"], 2);
        assert_eq!(value["seeds"][0]["lives"][1]["age_at_death"], 80);
    }

    #[test]
    fn console_report_mentions_lives() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        generate_console_report(&mut out, &summary(), Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Lives played: 2"));
        assert!(text.contains("Alex died at 70 (old age) with -50"));
        assert!(text.contains("bonuses: sharp_mind"));
    }
}

//! Generates the sample CSV files the service reads: candidates, jobs, and
//! feedback notes. Seeded, so regeneration with the same seed reproduces
//! the same data set.
//!
//! Usage:
//!   cargo run --bin generate_data -- [--data-dir data] [--seed 42]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use talentgate::models::{CandidateRow, FeedbackRow, JobRow};
use talentgate::scoring::features::DEFAULT_SKILLS_POOL;

const NUM_CANDIDATES: usize = 40;
const NUM_JOBS: usize = 8;

const LOCATIONS: &[&str] = &["Mumbai", "Bengaluru", "Remote", "Pune", "Delhi"];
const JOB_LOCATIONS: &[&str] = &["Mumbai", "Remote", "Pune"];
const EDUCATIONS: &[&str] = &["B.Tech", "M.Tech", "BSc", "MCA"];
const FEEDBACK_NOTES: &[&str] = &["Good communication", "Average skills", "Needs improvement"];

struct Args {
    data_dir: PathBuf,
    seed: u64,
}

fn parse_args() -> Result<Args> {
    let mut out = Args {
        data_dir: PathBuf::from("data"),
        seed: 42,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let v = args.next().context("Missing value for --data-dir")?;
                out.data_dir = PathBuf::from(v);
            }
            "--seed" => {
                let v = args.next().context("Missing value for --seed")?;
                out.seed = v.parse().context("--seed must be an integer")?;
            }
            other => bail!("Unknown argument: {other}"),
        }
    }
    Ok(out)
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("Failed to create {}", args.data_dir.display()))?;

    let candidates: Vec<CandidateRow> = (1..=NUM_CANDIDATES)
        .map(|i| make_candidate(i, &mut rng))
        .collect();
    write_csv(&args.data_dir.join("sample_cvs.csv"), &candidates)?;

    let jobs: Vec<JobRow> = (1..=NUM_JOBS).map(|i| make_job(i, &mut rng)).collect();
    write_csv(&args.data_dir.join("sample_jds.csv"), &jobs)?;

    let feedbacks: Vec<FeedbackRow> = candidates
        .iter()
        .map(|c| FeedbackRow {
            candidate_id: c.id.clone(),
            feedback_text: FEEDBACK_NOTES[rng.gen_range(0..FEEDBACK_NOTES.len())].to_string(),
        })
        .collect();
    write_csv(&args.data_dir.join("sample_feedbacks.csv"), &feedbacks)?;

    println!(
        "Generated {} candidates, {} jobs, {} feedbacks in {}",
        candidates.len(),
        jobs.len(),
        feedbacks.len(),
        args.data_dir.display()
    );
    Ok(())
}

fn make_candidate(i: usize, rng: &mut ChaCha8Rng) -> CandidateRow {
    let id = Uuid::new_v4().to_string()[..8].to_string();
    let name = format!("Candidate_{i}");
    let skills = sample_skills(rng);
    let experience_months = rng.gen_range(6..=120);
    CandidateRow {
        id,
        name: name.clone(),
        location: LOCATIONS[rng.gen_range(0..LOCATIONS.len())].to_string(),
        resume_text: format!(
            "{name} with skills {skills} and {experience_months} months exp. Worked on ML projects."
        ),
        skills,
        experience_months,
        education: EDUCATIONS[rng.gen_range(0..EDUCATIONS.len())].to_string(),
    }
}

fn make_job(i: usize, rng: &mut ChaCha8Rng) -> JobRow {
    let skills = sample_skills(rng);
    JobRow {
        id: format!("JD_{i}"),
        title: format!("Job_{i}"),
        location: JOB_LOCATIONS[rng.gen_range(0..JOB_LOCATIONS.len())].to_string(),
        description: format!("We are looking for skills {skills}"),
        required_skills: skills,
    }
}

/// 3 to 6 distinct skills from the pool, comma-joined.
fn sample_skills(rng: &mut ChaCha8Rng) -> String {
    let k = rng.gen_range(3..=6);
    let mut pool: Vec<&str> = DEFAULT_SKILLS_POOL.to_vec();
    // Partial Fisher-Yates: the first k slots end up uniformly sampled.
    for i in 0..k {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }
    pool[..k].join(",")
}

fn write_csv<T: serde::Serialize>(path: &PathBuf, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tabula_core::{Dispute, DisputeCategory, DisputePriority, DisputeStatus, RecordId};
use time::macros::date;
use time::{Date, Duration};

const VENDOR_ADJECTIVES: [&str; 12] = [
    "Premier",
    "Central",
    "Reliable",
    "Bright",
    "Quality",
    "Summit",
    "Eagle",
    "Heritage",
    "Greenleaf",
    "Sparks",
    "Hartley",
    "Apex",
];

const VENDOR_TRADES: [&str; 8] = [
    "Freight",
    "Supply",
    "Logistics",
    "Wholesale",
    "Packaging",
    "Electronics",
    "Textiles",
    "Foods",
];

const VENDOR_SUFFIXES: [&str; 6] = ["Co", "Group", "Partners", "Works", "Inc", "Traders"];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of plausible disputes. The same seed always yields the
/// same records, so property tests can sweep seeds and stay reproducible.
#[derive(Debug, Clone)]
pub struct DisputeFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl DisputeFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn dispute(&mut self, id: i64) -> Dispute {
        let status = *self.pick(&DisputeStatus::ALL);
        let category = *self.pick(&DisputeCategory::ALL);
        let priority = *self.pick(&DisputePriority::ALL);
        let opened = self.date_between(fixture_date(), days_after(fixture_date(), 540));
        let resolved = status
            .is_closed()
            .then(|| days_after(opened, self.int_range_i64(1, 45)));

        Dispute {
            id: RecordId::new(id),
            reference: format!("DSP-{id:04}"),
            vendor: self.vendor_name(),
            customer: format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES)),
            status,
            category,
            priority,
            // Round amounts are common enough to exercise equal sort keys.
            amount_cents: if self.rng.bool() {
                self.int_range_i64(1, 40) * 2_500
            } else {
                self.int_range_i64(500, 250_000)
            },
            opened,
            resolved,
        }
    }

    /// Ids run from 1 to `count`.
    pub fn disputes(&mut self, count: usize) -> Vec<Dispute> {
        (1..=count as i64).map(|id| self.dispute(id)).collect()
    }

    pub fn vendor_name(&mut self) -> String {
        if self.rng.bool() {
            format!("{} {}", self.pick(&LAST_NAMES), self.pick(&VENDOR_TRADES))
        } else {
            format!(
                "{} {} {}",
                self.pick(&VENDOR_ADJECTIVES),
                self.pick(&VENDOR_TRADES),
                self.pick(&VENDOR_SUFFIXES),
            )
        }
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn date_between(&mut self, start: Date, end: Date) -> Date {
        let span = (end - start).whole_days();
        days_after(start, self.int_range_i64(0, span))
    }
}

/// A pending billing dispute opened on [`fixture_date`]. Tests override the
/// fields they care about with struct update syntax.
pub fn dispute(id: i64) -> Dispute {
    Dispute {
        id: RecordId::new(id),
        reference: format!("DSP-{id:04}"),
        vendor: "Apex Freight Co".to_owned(),
        customer: "Quinn Ward".to_owned(),
        status: DisputeStatus::Pending,
        category: DisputeCategory::Billing,
        priority: DisputePriority::Medium,
        amount_cents: 10_000,
        opened: fixture_date(),
        resolved: None,
    }
}

/// Twelve hand-picked disputes covering every status and a few ties.
pub fn sample_disputes() -> Vec<Dispute> {
    let rows: [(&str, DisputeStatus, DisputePriority, i64, i64); 12] = [
        ("Apex Freight Co", DisputeStatus::Pending, DisputePriority::High, 12_500, 3),
        ("Summit Supply", DisputeStatus::Resolved, DisputePriority::Low, 4_000, 10),
        ("Hartley Logistics", DisputeStatus::Pending, DisputePriority::Critical, 98_000, 14),
        ("Reed Textiles", DisputeStatus::Rejected, DisputePriority::Medium, 2_500, 20),
        ("Apex Freight Co", DisputeStatus::Escalated, DisputePriority::High, 55_000, 28),
        ("Bright Foods Group", DisputeStatus::UnderReview, DisputePriority::Medium, 12_500, 35),
        ("Summit Supply", DisputeStatus::Pending, DisputePriority::Low, 7_800, 41),
        ("Gray Packaging", DisputeStatus::Resolved, DisputePriority::High, 31_000, 47),
        ("Eagle Electronics Inc", DisputeStatus::Pending, DisputePriority::Medium, 150_000, 60),
        ("Hartley Logistics", DisputeStatus::UnderReview, DisputePriority::Low, 900, 66),
        ("Reed Textiles", DisputeStatus::Escalated, DisputePriority::Critical, 64_250, 73),
        ("Bright Foods Group", DisputeStatus::Pending, DisputePriority::Medium, 12_500, 80),
    ];

    rows.into_iter()
        .zip(1_i64..)
        .map(|((vendor, status, priority, amount_cents, day), id)| {
            let opened = days_after(fixture_date(), day);
            Dispute {
                vendor: vendor.to_owned(),
                status,
                priority,
                category: DisputeCategory::ALL[(id as usize) % DisputeCategory::ALL.len()],
                amount_cents,
                opened,
                resolved: status.is_closed().then(|| days_after(opened, 7)),
                ..dispute(id)
            }
        })
        .collect()
}

pub fn fixture_date() -> Date {
    date!(2025 - 01 - 01)
}

pub fn temp_json_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("disputes.json");
    Ok((dir, path))
}

pub fn write_disputes_json(path: &Path, disputes: &[Dispute]) -> Result<()> {
    let json = serde_json::to_string_pretty(disputes).context("serialize disputes")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))
}

fn days_after(date: Date, days: i64) -> Date {
    date.checked_add(Duration::days(days)).unwrap_or(date)
}

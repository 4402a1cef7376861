// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::RecordId;
use crate::model::{
    FieldDescriptor, FieldKind, FieldRef, FilterDescriptor, FilterKind, Record, Schema,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Pending,
    UnderReview,
    Escalated,
    Resolved,
    Rejected,
}

impl DisputeStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::UnderReview,
        Self::Escalated,
        Self::Resolved,
        Self::Rejected,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Escalated => "escalated",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "under_review" => Some(Self::UnderReview),
            "escalated" => Some(Self::Escalated),
            "resolved" => Some(Self::Resolved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl DisputePriority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeCategory {
    Billing,
    Delivery,
    Quality,
    Fraud,
    Other,
}

impl DisputeCategory {
    pub const ALL: [Self; 5] = [
        Self::Billing,
        Self::Delivery,
        Self::Quality,
        Self::Fraud,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::Delivery => "delivery",
            Self::Quality => "quality",
            Self::Fraud => "fraud",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "billing" => Some(Self::Billing),
            "delivery" => Some(Self::Delivery),
            "quality" => Some(Self::Quality),
            "fraud" => Some(Self::Fraud),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub id: RecordId,
    pub reference: String,
    pub vendor: String,
    pub customer: String,
    pub status: DisputeStatus,
    pub category: DisputeCategory,
    pub priority: DisputePriority,
    pub amount_cents: i64,
    #[serde(with = "iso_date")]
    pub opened: Date,
    #[serde(with = "iso_date::option", default)]
    pub resolved: Option<Date>,
}

const DISPUTE_FIELDS: [FieldDescriptor; 10] = [
    FieldDescriptor::new("id", "ID", FieldKind::Number),
    FieldDescriptor::new("reference", "Reference", FieldKind::Text),
    FieldDescriptor::new("vendor", "Vendor", FieldKind::Text),
    FieldDescriptor::new("customer", "Customer", FieldKind::Text),
    FieldDescriptor::new("status", "Status", FieldKind::Category),
    FieldDescriptor::new("category", "Category", FieldKind::Category),
    FieldDescriptor::new("priority", "Priority", FieldKind::Category),
    FieldDescriptor::new("amount", "Amount", FieldKind::Number),
    FieldDescriptor::new("opened", "Opened", FieldKind::Date),
    FieldDescriptor::new("resolved", "Resolved", FieldKind::Date),
];

const DISPUTE_FILTERS: [FilterDescriptor; 2] = [
    FilterDescriptor::new("dateRange", "opened", FilterKind::DateRange),
    FilterDescriptor::new("amountRange", "amount", FilterKind::NumberRange),
];

impl Dispute {
    pub const SCHEMA: Schema = Schema::new(&DISPUTE_FIELDS, &DISPUTE_FILTERS);

    pub fn amount(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }
}

impl Record for Dispute {
    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldRef<'_>> {
        match name {
            "id" => Some(FieldRef::Number(self.id.get() as f64)),
            "reference" => Some(FieldRef::Text(&self.reference)),
            "vendor" => Some(FieldRef::Text(&self.vendor)),
            "customer" => Some(FieldRef::Text(&self.customer)),
            "status" => Some(FieldRef::Category(self.status.as_str())),
            "category" => Some(FieldRef::Category(self.category.as_str())),
            "priority" => Some(FieldRef::Category(self.priority.as_str())),
            "amount" => Some(FieldRef::Number(self.amount())),
            "opened" => Some(FieldRef::Date(self.opened)),
            "resolved" => self.resolved.map(FieldRef::Date),
            _ => None,
        }
    }
}

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Booking widget - browse the catalog, check availability and book appointments
#[derive(Parser, Debug)]
#[command(name = "booking-widget")]
#[command(about = "Headless driver for the booking wizard")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: build and print the booking request without sending it.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to a JSON configuration file (env vars still override it)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List bookable services
    Services {
        /// Free-text filter on the service name
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// List staff members
    Staff,
    /// Show available time slots for a day
    Slots {
        /// Day to check (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Catalog ids of the services to book
        #[arg(short = 'S', long = "service", num_args = 1.., conflicts_with = "duration")]
        services: Vec<i64>,
        /// Total duration in minutes, instead of looking services up
        #[arg(short = 'm', long)]
        duration: Option<u32>,
    },
    /// Look up a returning customer by phone number
    Lookup {
        /// Phone number (at least 7 characters)
        #[arg(short, long)]
        phone: String,
    },
    /// Book an appointment from a plan file
    Book {
        /// Path to the booking plan (JSON)
        plan: PathBuf,
    },
    /// Validate a booking plan file without contacting the API
    Validate {
        /// Path to the booking plan (JSON)
        plan: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

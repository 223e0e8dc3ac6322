//! Booking widget - command line entry point
//!
//! Drives the booking wizard core headlessly against the remote booking API.

mod cli;

use anyhow::{Context, Result};
use booking_widget::api::{BookingApi, HttpBookingApi};
use booking_widget::catalog::{self, ALL_SERVICES_PILL};
use booking_widget::clock::{Clock, SystemClock};
use booking_widget::plan::BookingPlan;
use booking_widget::session::BookingSession;
use booking_widget::slots::{self, BUSINESS_HOURS, SLOT_STEP_MINUTES, TimeSlot};
use booking_widget::validation::{self, CustomerInfoPatch};
use booking_widget::WidgetConfig;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

/// Initialize logging; `RUST_LOG` overrides the default `info` level
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> Result<()> {
    init_logging();
    info!("Booking widget starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    if let Commands::Validate { plan } = &cli.command {
        validate_plan(plan);
        return Ok(());
    }

    let config = WidgetConfig::resolve(cli.config.as_deref())?;
    let api = HttpBookingApi::new(&config);
    info!("Using booking API at {}", api.base_url());

    match cli.command {
        Commands::Services { search } => list_services(&api, &search),
        Commands::Staff => list_staff(&api, &config.cdn_url),
        Commands::Slots {
            date,
            services,
            duration,
        } => show_slots(&api, date, &services, duration),
        Commands::Lookup { phone } => lookup_customer(&api, &phone),
        Commands::Book { plan } => book(&api, &plan, cli.dry_run),
        Commands::Validate { .. } => Ok(()),
    }
}

fn validate_plan(path: &Path) {
    info!("Validating booking plan: {:?}", path);
    match BookingPlan::load_from_file(path).and_then(|plan| plan.validate().map(|_| plan)) {
        Ok(plan) => {
            info!("Booking plan validation successful");
            println!(
                "✓ Booking plan is valid: {} service(s) on {} at {}",
                plan.service_ids.len(),
                plan.date,
                plan.time
            );
        }
        Err(e) => {
            error!("Booking plan validation failed: {:#}", e);
            eprintln!("✗ Booking plan validation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn list_services(api: &impl BookingApi, search: &str) -> Result<()> {
    let services = api.services().context("Failed to load services")?;
    let matching = catalog::filter_services(&services, search, ALL_SERVICES_PILL);
    if matching.is_empty() {
        println!("No services available");
        return Ok(());
    }
    for service in matching {
        println!(
            "{:>5}  {:<32} {:>8} {:>10}",
            service.id,
            service.service_name,
            catalog::format_duration(service.working_time),
            catalog::format_price(service.service_price)
        );
    }
    Ok(())
}

fn list_staff(api: &impl BookingApi, cdn_url: &str) -> Result<()> {
    let employees = api.employees().context("Failed to load staff")?;
    for employee in &employees {
        let avatar = employee.avatar_url(cdn_url).unwrap_or_default();
        println!("{:>5}  {:<32} {}", employee.id, employee.employee_name, avatar);
    }
    Ok(())
}

fn print_slots(slots: &[TimeSlot]) {
    if slots.is_empty() {
        println!("No available times for this day");
        return;
    }
    for slot in slots {
        println!("{slot}");
    }
}

fn show_slots(
    api: &impl BookingApi,
    date: Option<chrono::NaiveDate>,
    service_ids: &[i64],
    duration: Option<u32>,
) -> Result<()> {
    let clock = SystemClock;
    let date = date.unwrap_or_else(|| clock.now().date());

    if let Some(minutes) = duration {
        let slots = slots::slots_for_duration(minutes, date, clock.now(), BUSINESS_HOURS, SLOT_STEP_MINUTES);
        print_slots(&slots);
        return Ok(());
    }

    if service_ids.is_empty() {
        anyhow::bail!("Select at least one service (--service) or give a --duration");
    }

    let mut session = BookingSession::new(api, clock);
    let report = session.load_catalogs();
    if let Some(e) = report.services_error {
        anyhow::bail!("Failed to load services: {e}");
    }
    for id in service_ids {
        session.select_service_by_id(*id)?;
    }
    session.select_date(date);

    let state = session.store().state();
    println!(
        "{} on {} ({}, {})",
        state
            .selected_services
            .iter()
            .map(|s| s.service_name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        date,
        catalog::format_duration(state.total_service_minutes()),
        catalog::format_price(state.total_service_price())
    );
    print_slots(&session.available_slots());
    Ok(())
}

fn lookup_customer(api: &impl BookingApi, phone: &str) -> Result<()> {
    if !validation::is_lookup_ready(phone) {
        anyhow::bail!(
            "Phone number must be at least {} characters",
            validation::MIN_LOOKUP_PHONE_LEN
        );
    }
    let customers = api
        .find_customers_by_phone(phone)
        .context("Customer lookup failed")?;
    match customers.first() {
        Some(customer) => println!(
            "✓ {} <{}>",
            customer.customer_name,
            if customer.customer_email.is_empty() { "no email" } else { &customer.customer_email }
        ),
        None => println!("No customer found for {phone}"),
    }
    Ok(())
}

fn book(api: &impl BookingApi, plan_path: &Path, dry_run: bool) -> Result<()> {
    let plan = BookingPlan::load_from_file(plan_path)?;
    plan.validate()?;

    let mut session = BookingSession::new(api, SystemClock);
    let report = session.load_catalogs();
    for warning in report.warnings() {
        println!("! {warning}");
    }
    if let Some(e) = report.services_error {
        anyhow::bail!("Failed to load services: {e}");
    }

    // Schedule step
    for id in &plan.service_ids {
        session.select_service_by_id(*id)?;
    }
    session.select_staff_by_id(plan.staff_id)?;
    session.select_date(plan.date);
    session.select_time(plan.time)?;
    session.continue_to_info()?;

    // Info step: lookup first, then the plan's own contact details win
    session.set_phone(&plan.customer.phone);
    if session.customer_found() {
        info!("Phone matches a returning customer");
    }
    session.set_contact(
        CustomerInfoPatch::default()
            .name(plan.customer.name.clone())
            .email(plan.customer.email.clone()),
    );
    let request = session.review()?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&request.envelope())?);
        return Ok(());
    }

    let booking = session.confirm_booking()?;
    println!("✓ Booking created successfully!");
    println!("  Code:   {}", booking.code_or_na());
    println!("  When:   {} {}", booking.booking_date, booking.booking_time);
    if let Some(status) = booking.booking_status {
        println!("  Status: {}", status.label());
    }
    session.return_home();
    Ok(())
}

//! Interactive batch forms shared by `create`, `update` and `watch`.

use crate::libs::batch::{BatchForm, BatchRecord, BatchUpdate, ProductStatus, MAX_EMPLOYEE_COUNT, PACKING_FORMATS};
use crate::libs::clock;
use crate::libs::error::DashboardError;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};

/// Batch details form. Fields already set in `seed` are not asked again.
pub fn prompt_batch_form(products: &[String], seed: BatchForm) -> Result<BatchForm> {
    let theme = ColorfulTheme::default();

    let ubi_no = ask_text(&theme, Message::PromptUbiNo, seed.ubi_no)?;
    let batch_number = ask_text(&theme, Message::PromptBatchNumber, seed.batch_number)?;

    let product = if !seed.product.trim().is_empty() {
        seed.product
    } else if products.is_empty() {
        ask_text(&theme, Message::PromptProduct, String::new())?
    } else {
        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptProduct.to_string())
            .items(products)
            .default(0)
            .interact()?;
        products[selection].clone()
    };

    let packing_format = if !seed.packing_format.trim().is_empty() {
        seed.packing_format
    } else {
        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptPackingFormat.to_string())
            .items(&PACKING_FORMATS)
            .default(0)
            .interact()?;
        PACKING_FORMATS[selection].to_string()
    };

    Ok(BatchForm {
        ubi_no,
        batch_number,
        product,
        packing_format,
    })
}

fn ask_text(theme: &ColorfulTheme, prompt: Message, seed: String) -> Result<String> {
    if !seed.trim().is_empty() {
        return Ok(seed);
    }
    Ok(Input::<String>::with_theme(theme).with_prompt(prompt.to_string()).interact_text()?)
}

/// Batch update form, pre-selected with the record's current values.
pub fn prompt_update(record: &BatchRecord, products: &[String]) -> Result<BatchUpdate> {
    let theme = ColorfulTheme::default();

    let product = if products.is_empty() {
        Input::<String>::with_theme(&theme)
            .with_prompt(Message::PromptProduct.to_string())
            .default(record.product.clone())
            .interact_text()?
    } else {
        let current = products.iter().position(|product| product == &record.product).unwrap_or(0);
        let selection = Select::with_theme(&theme)
            .with_prompt(Message::PromptProduct.to_string())
            .items(products)
            .default(current)
            .interact()?;
        products[selection].clone()
    };

    let statuses = ProductStatus::SELECTABLE;
    let current = statuses.iter().position(|status| *status == record.product_status).unwrap_or(0);
    let status = Select::with_theme(&theme)
        .with_prompt(Message::PromptProductStatus.to_string())
        .items(&statuses)
        .default(current)
        .interact()?;

    let start_options = clock::time_options();
    let start_time = select_time(&theme, Message::PromptStartTime, &start_options, record.start_time.as_deref())?;

    let end_options = clock::end_time_options(&start_time);
    if end_options.is_empty() {
        return Err(msg_error_anyhow!(Message::NoEndTimeAvailable(start_time)));
    }
    let end_time = select_time(&theme, Message::PromptEndTime, &end_options, record.end_time.as_deref())?;

    let counts: Vec<u32> = (1..=MAX_EMPLOYEE_COUNT).collect();
    let current = record
        .employee_count
        .and_then(|count| counts.iter().position(|c| *c == count))
        .unwrap_or(0);
    let employee_count = Select::with_theme(&theme)
        .with_prompt(Message::PromptEmployeeCount.to_string())
        .items(&counts)
        .default(current)
        .interact()?;

    let actual_units: i64 = Input::with_theme(&theme)
        .with_prompt(Message::PromptActualUnits.to_string())
        .default(record.actual_units)
        .validate_with(|value: &i64| if *value >= 0 { Ok(()) } else { Err(DashboardError::NegativeUnits(*value).to_string()) })
        .interact_text()?;

    Ok(BatchUpdate {
        product: Some(product),
        product_status: Some(statuses[status]),
        start_time: Some(start_time),
        end_time: Some(end_time),
        employee_count: Some(counts[employee_count]),
        actual_units: Some(actual_units),
    })
}

fn select_time(theme: &ColorfulTheme, prompt: Message, options: &[String], current: Option<&str>) -> Result<String> {
    let current = current.map(clock::normalize_time_format).unwrap_or_default();
    let default = options.iter().position(|option| *option == current).unwrap_or(0);
    let selection = Select::with_theme(theme)
        .with_prompt(prompt.to_string())
        .items(options)
        .default(default)
        .interact()?;
    Ok(options[selection].clone())
}

use chrono::{NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::config::PricingConfig;
use crate::models::{
    catalog::BankAccount,
    quote::{QuoteDraft, QuoteResponse, QuoteStatus, SavedQuote},
};
use crate::services::{
    occupancy_service::QuoteError,
    pricing_service::PricingService,
    quote_document_service::{self, DocumentContext},
};

/// QT-YYMMDD-XXXX with an uppercase alphanumeric suffix.
pub fn generate_reference(date: NaiveDate) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();
    format!("QT-{}-{}", date.format("%y%m%d"), suffix)
}

/// Price a draft and render both documents from the same calculation.
pub fn build_documents(
    draft: &QuoteDraft,
    config: &PricingConfig,
    reference: &str,
    bank_account: Option<&BankAccount>,
) -> Result<QuoteResponse, QuoteError> {
    let calculation = PricingService::calculate(draft, config)?;
    let ctx = DocumentContext {
        reference,
        client_name: &draft.client_name,
        inclusions: &draft.inclusions,
        bank_account,
    };
    let html = quote_document_service::render_html(&calculation, &ctx);
    let breakdown = quote_document_service::render_breakdown(&calculation);

    Ok(QuoteResponse {
        calculation,
        html,
        breakdown,
    })
}

pub fn new_saved_quote(
    draft: QuoteDraft,
    config: &PricingConfig,
    created_by: Option<String>,
    bank_account: Option<&BankAccount>,
) -> Result<SavedQuote, QuoteError> {
    let now = Utc::now();
    let reference = generate_reference(now.date_naive());
    let documents = build_documents(&draft, config, &reference, bank_account)?;

    Ok(SavedQuote {
        id: None,
        reference,
        draft,
        calculation: documents.calculation,
        html: documents.html,
        breakdown: documents.breakdown,
        status: QuoteStatus::Draft,
        created_by,
        created_at: Some(now),
        updated_at: Some(now),
    })
}

/// Replace the draft of a stored quote, re-pricing and re-rendering so the
/// stored documents always match it.
pub fn revise_quote(
    quote: &mut SavedQuote,
    draft: QuoteDraft,
    config: &PricingConfig,
    bank_account: Option<&BankAccount>,
) -> Result<(), QuoteError> {
    let documents = build_documents(&draft, config, &quote.reference, bank_account)?;
    quote.draft = draft;
    quote.calculation = documents.calculation;
    quote.html = documents.html;
    quote.breakdown = documents.breakdown;
    quote.updated_at = Some(Utc::now());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        pax::{OccupancySelection, PaxComposition, StayPeriod},
        quote::{AddOns, HotelChoice},
    };

    fn draft(adults: u32) -> QuoteDraft {
        QuoteDraft {
            client_name: "Okafor".to_string(),
            stay: StayPeriod::new(
                NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
            ),
            pax: PaxComposition::new(adults, 0, 0, 0),
            occupancy: OccupancySelection::Rooms {
                single: false,
                double: true,
                triple: false,
            },
            hotel: Some(HotelChoice {
                hotel_id: None,
                name: "JBR Suites".to_string(),
                rate: 640.0,
                extra_bed_rate: 0.0,
            }),
            tours: Vec::new(),
            add_ons: AddOns::default(),
            inclusions: Vec::new(),
        }
    }

    #[test]
    fn test_reference_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let reference = generate_reference(date);
        assert!(reference.starts_with("QT-250309-"));
        assert_eq!(reference.len(), "QT-250309-".len() + 4);
        assert!(reference[10..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_saved_quote_documents_match_calculation() {
        let quote = new_saved_quote(draft(2), &PricingConfig::default(), None, None).unwrap();
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert!(quote.html.contains(&quote.reference));
        // 640 x 4 / 2
        assert_eq!(quote.calculation.options[0].adult.aed, 1280.0);
        assert!(quote.breakdown.ends_with("Total - 1280"));
    }

    #[test]
    fn test_revise_rerenders_everything() {
        let mut quote = new_saved_quote(draft(2), &PricingConfig::default(), None, None).unwrap();
        let reference = quote.reference.clone();

        let mut changed = draft(2);
        changed.hotel.as_mut().unwrap().rate = 800.0;
        revise_quote(&mut quote, changed.clone(), &PricingConfig::default(), None).unwrap();

        assert_eq!(quote.reference, reference);
        assert_eq!(quote.draft, changed);
        assert_eq!(quote.calculation.options[0].adult.aed, 1600.0);
        assert!(quote.breakdown.ends_with("Total - 1600"));
        assert!(quote.html.contains("AED 1600"));
    }

    #[test]
    fn test_revise_keeps_old_quote_on_error() {
        let mut quote = new_saved_quote(draft(2), &PricingConfig::default(), None, None).unwrap();
        let before = quote.breakdown.clone();
        assert_eq!(
            revise_quote(&mut quote, draft(0), &PricingConfig::default(), None),
            Err(QuoteError::NoTravellers)
        );
        assert_eq!(quote.breakdown, before);
    }
}

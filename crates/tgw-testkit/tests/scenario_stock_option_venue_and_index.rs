//! Scenario: stock-option reference data gets its venue from the contract
//! id and a normalized chain index from the display symbol.
//!
//! GREEN when:
//! - ids starting with `9` land on SZSE, any other leading digit on SSE
//! - a display symbol with a marker letter yields `{strike:.3}-{tail from marker}`
//! - a display symbol without a marker yields the plain strike
//! - option attributes are derived from the underlying and expiry

use tgw_schemas::{Exchange, OptionType, Product};
use tgw_session::options::option_index;
use tgw_testkit::fixtures::{drive_options_to_loaded, option_instrument, options_harness};

#[test]
fn venue_follows_leading_digit() {
    let mut h = options_harness("NHSTOCK", 0);
    drive_options_to_loaded(
        &mut h.session,
        &[
            option_instrument("920001", "300ETF购6M4000", 4.0),
            option_instrument("600001", "50ETF沽6A2500", 2.5),
        ],
    );

    let szse = h.directory.lookup("920001").unwrap();
    let sse = h.directory.lookup("600001").unwrap();
    assert_eq!(szse.exchange, Exchange::SZSE);
    assert_eq!(sse.exchange, Exchange::SSE);
    assert_eq!(szse.product, Product::Option);
    assert_eq!(h.sink.contracts().len(), 2);
}

#[test]
fn option_attributes_from_reference_record() {
    let mut h = options_harness("NHSTOCK", 0);
    drive_options_to_loaded(
        &mut h.session,
        &[option_instrument("10004567", "50ETF购6月 M2950", 2.95)],
    );

    let c = h.directory.lookup("10004567").unwrap();
    let opt = c.option.as_ref().unwrap();
    assert_eq!(opt.index, "2.950-M2950");
    assert_eq!(opt.portfolio, "510050");
    assert_eq!(opt.underlying, "510050_20240626");
    assert_eq!(opt.option_type, Some(OptionType::Call));
    assert_eq!(c.size, 10000.0);
    assert_eq!(c.vt_symbol(), "10004567.SSE");
}

#[test]
fn index_marker_rules() {
    // Marker found at position k: strike with three decimals, then symbol[k..].
    assert_eq!(option_index(3.1, "50ETF沽6M3100"), "3.100-M3100");
    // No marker letter at all.
    assert_eq!(option_index(2.95, "50ETF购六月"), "2.95");
    assert_eq!(option_index(3.0, "沪深300购"), "3.0");
}

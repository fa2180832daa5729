//! Single-character protocol codes.
//!
//! `futures` follows the CTP-style `THOST_FTDC_*` table used by the futures
//! trading API. `stock` follows the FIX-style table used by the stock-option
//! trading API.

pub mod futures {
    // Direction
    pub const D_BUY: char = '0';
    pub const D_SELL: char = '1';

    // Position direction
    pub const PD_LONG: char = '2';
    pub const PD_SHORT: char = '3';

    // Order price type
    pub const OPT_ANY_PRICE: char = '1';
    pub const OPT_LIMIT_PRICE: char = '2';

    // Offset flag
    pub const OF_OPEN: char = '0';
    pub const OF_CLOSE: char = '1';
    pub const OF_CLOSE_TODAY: char = '3';
    pub const OF_CLOSE_YESTERDAY: char = '4';

    // Order submit status
    pub const OAS_SUBMITTED: char = 'a';
    pub const OAS_ACCEPTED: char = 'b';
    pub const OAS_REJECTED: char = 'c';

    // Order status
    pub const OST_ALL_TRADED: char = '0';
    pub const OST_PART_TRADED_QUEUEING: char = '1';
    pub const OST_NO_TRADE_QUEUEING: char = '3';
    pub const OST_CANCELED: char = '5';

    // Product class
    pub const PC_FUTURES: char = '1';
    pub const PC_OPTIONS: char = '2';
    pub const PC_COMBINATION: char = '3';
    pub const PC_SPOT_OPTION: char = '6';

    // Option type
    pub const CP_CALL: char = '1';
    pub const CP_PUT: char = '2';

    pub const HF_SPECULATION: char = '1';
    pub const CC_IMMEDIATELY: char = '1';
    pub const FCC_NOT_FORCE_CLOSE: char = '0';

    // Time condition
    pub const TC_IOC: char = '1';
    pub const TC_GFD: char = '3';

    // Volume condition
    pub const VC_AV: char = '1';
    pub const VC_CV: char = '3';

    pub const AF_DELETE: char = '0';
}

pub mod stock {
    pub const ORD_TYPE_MARKET: char = '1';
    pub const ORD_TYPE_LIMIT: char = '2';

    pub const SIDE_BUY: char = '1';
    pub const SIDE_SELL: char = '2';

    pub const OC_OPEN: char = 'O';
    pub const OC_CLOSE: char = 'C';

    pub const TIF_GFD: char = '0';
    pub const TIF_IOC: char = '3';
    pub const TIF_FOK: char = '4';

    pub const STATUS_SUCCESS: char = '0';
    pub const STATUS_TRADE: char = '1';
    pub const STATUS_ALL: char = '2';
    pub const STATUS_CANCEL: char = '4';
    pub const STATUS_REJECT: char = '8';

    /// European-exercise call.
    pub const CALL_OR_PUT_E: char = 'E';
    /// Put.
    pub const CALL_OR_PUT_A: char = 'A';

    pub const OWNER_TYPE_PERSONAL: i32 = 1;
    pub const COVERED_NO: i32 = 1;
}

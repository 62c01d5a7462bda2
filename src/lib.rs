pub mod config;
pub mod error;
pub mod state;
pub mod db;
pub mod routes;

pub mod crypto {
    pub mod password;
    pub mod token;
}

pub mod models {
    pub mod account;
    pub mod session;
    pub mod shipment;
}

pub mod repositories {
    pub mod account;
    pub mod session;
    pub mod shipment;
}

pub mod services {
    pub mod auth;
    pub mod shipments;
}

pub mod handlers {
    pub mod auth;
    pub mod shipments;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
    pub mod report;
    pub mod shipment;
}

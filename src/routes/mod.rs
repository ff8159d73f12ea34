use actix_web::web::{scope, ServiceConfig};
use actix_web::Scope;

use access::get_access;
use health_check::get_health;

mod access;
mod health_check;

pub use health_check::ServiceName;

fn access_routes() -> Scope {
    scope("access").service(get_access)
}

pub fn authr_routes(conf: &mut ServiceConfig) {
    conf.service(access_routes()).service(get_health);
}

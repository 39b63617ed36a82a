pub mod set_user_timezone;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/timezone",
        web::put().to(set_user_timezone::set_user_timezone_controller),
    );
}

pub mod restock_item;
pub mod sweep_low_stock;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/items/{item_id}/restock",
        web::post().to(restock_item::restock_item_controller),
    );
}

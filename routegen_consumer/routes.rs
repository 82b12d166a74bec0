// Registration source the client in this crate is generated from. It is read
// by build.rs and never compiled.

use routable::*;

pub fn init() {
    let ns = beego::new_namespace(
        "/api",
        [
            beego::ns_router(
                "/items/:id",
                &controllers::ItemController {},
                mapping_methods([
                    GET(controllers::DefaultItemController::get),
                    PUT(controllers::DefaultItemController::update),
                ]),
            ),
            beego::ns_router(
                "/items/:type",
                &controllers::ItemController {},
                mapping_methods([POST(controllers::DefaultItemController::create)]),
            ),
            beego::ns_router(
                "/docs/:body",
                &controllers::DocController {},
                mapping_methods([DELETE(controllers::DefaultDocController::remove)]),
            ),
        ],
    );
    beego::add_namespace(ns);
}

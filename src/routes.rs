use actix_web::{middleware::from_fn, web};

use crate::{
    api::employee,
    auth::{handlers, middleware::auth_middleware},
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .service(
                web::scope("/auth")
                    .service(web::resource("/login").route(web::post().to(handlers::login))),
            )
            // Protected routes
            .service(
                web::scope("/employees")
                    .wrap(from_fn(auth_middleware))
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/departments/{department}/average-salary")
                            .route(web::get().to(employee::average_salary)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            ),
    );
}

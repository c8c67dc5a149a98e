pub mod dashboard_routes;

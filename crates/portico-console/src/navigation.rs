//! Built-in navigation tree of the administrative console.

use portico_core::models::route::RouteNode;

/// Sections and pages of the console, in display order.
pub fn console_navigation() -> Vec<RouteNode> {
    vec![
        RouteNode::section(
            "Push",
            vec![
                RouteNode::leaf("Crear Push", "/dashboard/push").requires("/dashboard/push"),
                RouteNode::leaf("Historial", "/dashboard/push/logs").requires("/push/logs"),
            ],
        ),
        RouteNode::section(
            "In-App",
            vec![
                RouteNode::leaf("Mensajes", "/dashboard/in-app").requires("/in-app"),
                RouteNode::leaf("Plantillas", "/dashboard/in-app/templates")
                    .requires("/in-app/templates"),
            ],
        ),
        RouteNode::section(
            "Comercial",
            vec![
                RouteNode::leaf("Precios", "/dashboard/prices").requires("/prices"),
                RouteNode::section(
                    "Ventas",
                    vec![
                        RouteNode::leaf("Reportes", "/dashboard/sales").requires("/sales"),
                        RouteNode::leaf("Webhooks", "/dashboard/sales/webhooks")
                            .requires("/webhooks/logs"),
                    ],
                ),
            ],
        ),
        RouteNode::section(
            "Administración",
            vec![
                RouteNode::leaf("Usuarios", "/dashboard/users").requires("/users"),
                RouteNode::leaf("Roles", "/dashboard/roles").requires("/roles"),
                RouteNode::leaf("Permisos", "/dashboard/permissions").requires("/permissions"),
            ],
        ),
        RouteNode::section(
            "Cuenta",
            vec![RouteNode::leaf("Perfil", "/dashboard/profile")],
        ),
    ]
}

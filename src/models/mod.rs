// Sales pipeline document models. These mirror the host ERP's document
// shapes; persistence and numbering stay on the host side.
pub mod de;
pub mod delivery_bom;
pub mod delivery_note;
pub mod item;
pub mod opportunity;
pub mod product_bundle;
pub mod purchase_order;
pub mod quotation;
pub mod sales_invoice;
pub mod sales_order;

pub use delivery_bom::DeliveryComponentRow;
pub use delivery_note::{DeliveryNote, DeliveryNoteItem};
pub use item::ItemMaster;
pub use opportunity::{BundleComponentRow, Opportunity, OpportunityItem};
pub use product_bundle::{ProductBundle, ProductBundleItem};
pub use purchase_order::{PurchaseOrder, PurchaseOrderItem};
pub use quotation::{Quotation, QuotationItem};
pub use sales_invoice::{OutstandingInvoice, SalesInvoice, SalesInvoiceItem};
pub use sales_order::{SalesOrder, SalesOrderItem};

pub mod whatsapp_sender;

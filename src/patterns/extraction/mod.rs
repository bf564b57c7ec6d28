pub mod phonenumber;

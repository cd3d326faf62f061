pub mod descriptor;
